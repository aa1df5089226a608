use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use campus_authz::audit::RoleAudit;
use campus_authz::authz::{derive_category, validate_capability, Policy, Role};
use campus_authz::bindings::{identity_channel, PermissionsHook, SessionBinding};
use campus_authz::config::AuthzConfig;
use campus_authz::events::{init_event_bus, start_audit_listener};
use campus_authz::{AuthorizationSession, Authorizer};

#[derive(Parser, Debug)]
#[command(author, version, about = "campus authorization policy tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List roles with their capability counts
    Roles,
    /// List catalog capabilities with descriptions
    Permissions {
        #[arg(long)]
        category: Option<String>,
    },
    /// Check whether a role holds a capability
    Check {
        #[arg(long)]
        role: Role,
        capability: String,
    },
    /// Check whether a role can access a feature
    Feature {
        #[arg(long)]
        role: Role,
        name: String,
    },
    /// Show everything a role can do, grouped by category
    Audit {
        #[arg(long)]
        role: Role,
        #[arg(long)]
        json: bool,
    },
    /// Validate the configured policy and print its fingerprint
    Validate,
    /// Feed a sequence of roles ("none" logs out) through a session
    Simulate {
        #[arg(required = true)]
        roles: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_env();
    init_tracing();

    let cli = Cli::parse();
    let config = AuthzConfig::from_env();
    let policy = Arc::new(config.load_policy().context("failed to load authorization policy")?);

    match cli.command {
        Commands::Roles => {
            println!("{:<6} {:<22} {}", "Id", "Role", "Capabilities");
            for (role, capabilities) in policy.matrix().iter() {
                println!("{:<6} {:<22} {}", role.id(), role.to_string(), capabilities.len());
            }
        }
        Commands::Permissions { category } => {
            for capability in policy.catalog().iter() {
                if let Some(wanted) = &category {
                    if derive_category(capability)? != wanted.as_str() {
                        continue;
                    }
                }
                println!("{:<40} {}", capability, policy.describe(capability));
            }
        }
        Commands::Check { role, capability } => {
            validate_capability(&capability)?;
            let session = AuthorizationSession::new(policy.clone());
            session.activate(role);
            let verdict = if session.has(&capability) { "granted" } else { "denied" };
            println!("{role} {capability}: {verdict}");
        }
        Commands::Feature { role, name } => {
            let session = AuthorizationSession::new(policy.clone());
            session.activate(role);
            let verdict = if session.can_access(&name) { "granted" } else { "denied" };
            println!("{role} feature {name}: {verdict}");
        }
        Commands::Audit { role, json } => {
            let audit = RoleAudit::for_role(&policy, role);
            if json {
                println!("{}", serde_json::to_string_pretty(&audit)?);
            } else {
                print_audit(&audit);
            }
        }
        Commands::Validate => {
            policy.validate()?;
            for capability in policy.undocumented() {
                println!("warning: {capability} has no description");
            }
            println!(
                "policy ok: {} capabilities, {} roles, fingerprint {}",
                policy.catalog().len(),
                policy.matrix().roles().count(),
                policy.fingerprint()
            );
        }
        Commands::Simulate { roles } => simulate(policy, &roles).await?,
    }

    Ok(())
}

async fn simulate(policy: Arc<Policy>, steps: &[String]) -> anyhow::Result<()> {
    let steps = steps
        .iter()
        .map(|step| match step.as_str() {
            "none" | "logout" => Ok(None),
            other => other.parse::<Role>().map(Some),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let (event_bus, rx) = init_event_bus();
    let listener = tokio::spawn(start_audit_listener(rx));

    let session = Arc::new(AuthorizationSession::new(policy).with_event_bus(event_bus));
    let (publisher, signal) = identity_channel(None);
    let mut hook = PermissionsHook::new(SessionBinding::new(session, signal));
    hook.current();

    for role in steps {
        publisher.set(role);
        let snapshot = if hook.binding().is_initialized() {
            // Same role as before: nothing to wait for.
            hook.current()
        } else {
            hook.next().await?
        };
        let label = snapshot.role().map_or_else(|| "none".to_string(), |r| r.to_string());
        println!(
            "{:<22} admin={:<5} management={:<5} categories=[{}] capabilities={}",
            label,
            snapshot.is_admin(),
            snapshot.is_management(),
            snapshot.available_categories().join(","),
            snapshot.capabilities().len()
        );
    }

    // Dropping the hook drops the session and with it the event bus sender.
    drop(hook);
    listener.await.context("audit listener panicked")?;
    Ok(())
}

fn print_audit(audit: &RoleAudit) {
    println!("role: {} (id {})", audit.role, audit.role.id());
    println!("policy: {}", audit.policy_fingerprint);
    println!("capabilities: {}", audit.capability_count);
    for category in &audit.categories {
        println!();
        println!("[{}]", category.category);
        for entry in &category.capabilities {
            println!("  {:<40} {}", entry.capability, entry.description);
        }
    }
}

fn load_env() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let crate_env = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    let _ = dotenvy::from_path(crate_env);
}

fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr);

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
