use std::fs;

fn main() -> anyhow::Result<()> {
    // Emits the built-in policy in the same format AUTHZ_POLICY_PATH accepts,
    // as a starting point for a custom policy file. Prints to stdout unless a
    // path is given.
    let document = campus_authz::Policy::builtin().to_document();
    let s = serde_json::to_string_pretty(&document)?;
    match std::env::args().nth(1) {
        Some(path) => {
            fs::write(&path, s)?;
            eprintln!("wrote {}", path);
        }
        None => println!("{s}"),
    }
    Ok(())
}
