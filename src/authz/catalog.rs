//! Permission catalog: the closed set of capability tokens.
//!
//! A capability is a `"<category>.<action>"` string. The category is the
//! text before the separator and is never stored separately.

use std::collections::BTreeSet;

use crate::errors::{AuthzError, AuthzResult};

pub const SEPARATOR: char = '.';

// Academic
pub const ACADEMIC_VIEW_GRADES: &str = "academic.view_grades";
pub const ACADEMIC_EDIT_GRADES: &str = "academic.edit_grades";
pub const ACADEMIC_VIEW_ASSIGNMENTS: &str = "academic.view_assignments";
pub const ACADEMIC_CREATE_ASSIGNMENTS: &str = "academic.create_assignments";
pub const ACADEMIC_GRADE_ASSIGNMENTS: &str = "academic.grade_assignments";
pub const ACADEMIC_VIEW_TIMETABLE: &str = "academic.view_timetable";
pub const ACADEMIC_MANAGE_TIMETABLE: &str = "academic.manage_timetable";
pub const ACADEMIC_VIEW_CURRICULUM: &str = "academic.view_curriculum";
pub const ACADEMIC_MANAGE_CURRICULUM: &str = "academic.manage_curriculum";
pub const ACADEMIC_VIEW_EXAM_RESULTS: &str = "academic.view_exam_results";
pub const ACADEMIC_PUBLISH_EXAM_RESULTS: &str = "academic.publish_exam_results";

// Attendance
pub const ATTENDANCE_VIEW_OWN: &str = "attendance.view_own";
pub const ATTENDANCE_VIEW_CHILD: &str = "attendance.view_child";
pub const ATTENDANCE_VIEW_CLASS: &str = "attendance.view_class";
pub const ATTENDANCE_MARK: &str = "attendance.mark";
pub const ATTENDANCE_EDIT: &str = "attendance.edit";
pub const ATTENDANCE_VIEW_SCHOOL: &str = "attendance.view_school";

// Communication
pub const COMMUNICATION_VIEW_MESSAGES: &str = "communication.view_messages";
pub const COMMUNICATION_SEND_MESSAGES: &str = "communication.send_messages";
pub const COMMUNICATION_VIEW_ANNOUNCEMENTS: &str = "communication.view_announcements";
pub const COMMUNICATION_SEND_ANNOUNCEMENTS: &str = "communication.send_announcements";
pub const COMMUNICATION_MANAGE_ANNOUNCEMENTS: &str = "communication.manage_announcements";
pub const COMMUNICATION_CONTACT_PARENTS: &str = "communication.contact_parents";
pub const COMMUNICATION_CONTACT_EDUCATORS: &str = "communication.contact_educators";

// Finance
pub const FINANCE_VIEW_FEES: &str = "finance.view_fees";
pub const FINANCE_PAY_FEES: &str = "finance.pay_fees";
pub const FINANCE_MANAGE_FEES: &str = "finance.manage_fees";
pub const FINANCE_VIEW_FINANCIAL_REPORTS: &str = "finance.view_financial_reports";
pub const FINANCE_PROCESS_REFUNDS: &str = "finance.process_refunds";

// Reports
pub const REPORTS_VIEW_STUDENT_REPORTS: &str = "reports.view_student_reports";
pub const REPORTS_VIEW_CLASS_REPORTS: &str = "reports.view_class_reports";
pub const REPORTS_VIEW_SCHOOL_REPORTS: &str = "reports.view_school_reports";
pub const REPORTS_GENERATE_REPORTS: &str = "reports.generate_reports";
pub const REPORTS_EXPORT_REPORTS: &str = "reports.export_reports";

// Users
pub const USERS_VIEW_OWN_PROFILE: &str = "users.view_own_profile";
pub const USERS_EDIT_OWN_PROFILE: &str = "users.edit_own_profile";
pub const USERS_VIEW_PROFILES: &str = "users.view_profiles";
pub const USERS_MANAGE_STUDENTS: &str = "users.manage_students";
pub const USERS_MANAGE_EDUCATORS: &str = "users.manage_educators";
pub const USERS_MANAGE_PARENTS: &str = "users.manage_parents";
pub const USERS_MANAGE_STAFF: &str = "users.manage_staff";
pub const USERS_ASSIGN_ROLES: &str = "users.assign_roles";

// Calendar
pub const CALENDAR_VIEW_EVENTS: &str = "calendar.view_events";
pub const CALENDAR_CREATE_EVENTS: &str = "calendar.create_events";
pub const CALENDAR_MANAGE_EVENTS: &str = "calendar.manage_events";

// System
pub const SYSTEM_MANAGE_SETTINGS: &str = "system.manage_settings";
pub const SYSTEM_VIEW_AUDIT_LOGS: &str = "system.view_audit_logs";
pub const SYSTEM_MANAGE_INTEGRATIONS: &str = "system.manage_integrations";
pub const SYSTEM_BACKUP_DATA: &str = "system.backup_data";

/// Every built-in capability.
pub const ALL: &[&str] = &[
    ACADEMIC_VIEW_GRADES,
    ACADEMIC_EDIT_GRADES,
    ACADEMIC_VIEW_ASSIGNMENTS,
    ACADEMIC_CREATE_ASSIGNMENTS,
    ACADEMIC_GRADE_ASSIGNMENTS,
    ACADEMIC_VIEW_TIMETABLE,
    ACADEMIC_MANAGE_TIMETABLE,
    ACADEMIC_VIEW_CURRICULUM,
    ACADEMIC_MANAGE_CURRICULUM,
    ACADEMIC_VIEW_EXAM_RESULTS,
    ACADEMIC_PUBLISH_EXAM_RESULTS,
    ATTENDANCE_VIEW_OWN,
    ATTENDANCE_VIEW_CHILD,
    ATTENDANCE_VIEW_CLASS,
    ATTENDANCE_MARK,
    ATTENDANCE_EDIT,
    ATTENDANCE_VIEW_SCHOOL,
    COMMUNICATION_VIEW_MESSAGES,
    COMMUNICATION_SEND_MESSAGES,
    COMMUNICATION_VIEW_ANNOUNCEMENTS,
    COMMUNICATION_SEND_ANNOUNCEMENTS,
    COMMUNICATION_MANAGE_ANNOUNCEMENTS,
    COMMUNICATION_CONTACT_PARENTS,
    COMMUNICATION_CONTACT_EDUCATORS,
    FINANCE_VIEW_FEES,
    FINANCE_PAY_FEES,
    FINANCE_MANAGE_FEES,
    FINANCE_VIEW_FINANCIAL_REPORTS,
    FINANCE_PROCESS_REFUNDS,
    REPORTS_VIEW_STUDENT_REPORTS,
    REPORTS_VIEW_CLASS_REPORTS,
    REPORTS_VIEW_SCHOOL_REPORTS,
    REPORTS_GENERATE_REPORTS,
    REPORTS_EXPORT_REPORTS,
    USERS_VIEW_OWN_PROFILE,
    USERS_EDIT_OWN_PROFILE,
    USERS_VIEW_PROFILES,
    USERS_MANAGE_STUDENTS,
    USERS_MANAGE_EDUCATORS,
    USERS_MANAGE_PARENTS,
    USERS_MANAGE_STAFF,
    USERS_ASSIGN_ROLES,
    CALENDAR_VIEW_EVENTS,
    CALENDAR_CREATE_EVENTS,
    CALENDAR_MANAGE_EVENTS,
    SYSTEM_MANAGE_SETTINGS,
    SYSTEM_VIEW_AUDIT_LOGS,
    SYSTEM_MANAGE_INTEGRATIONS,
    SYSTEM_BACKUP_DATA,
];

/// Returns the category of a capability: everything before the first `.`.
pub fn derive_category(capability: &str) -> AuthzResult<&str> {
    capability
        .split_once(SEPARATOR)
        .map(|(category, _)| category)
        .ok_or_else(|| AuthzError::malformed(capability))
}

/// Checks the full token shape: exactly one separator with a non-empty
/// category and action on either side.
pub fn validate_capability(capability: &str) -> AuthzResult<()> {
    match capability.split_once(SEPARATOR) {
        Some((category, action))
            if !category.is_empty() && !action.is_empty() && !action.contains(SEPARATOR) =>
        {
            Ok(())
        }
        _ => Err(AuthzError::malformed(capability)),
    }
}

/// Lenient category lookup for capabilities already known to be valid.
pub(crate) fn category_of(capability: &str) -> &str {
    derive_category(capability).unwrap_or(capability)
}

/// A validated, closed set of capabilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: BTreeSet<String>,
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            entries: ALL.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn from_entries<I, S>(entries: I) -> AuthzResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|entry| {
                let entry = entry.into();
                validate_capability(&entry).map(|_| entry)
            })
            .collect::<AuthzResult<BTreeSet<_>>>()?;
        Ok(Self { entries })
    }

    pub fn contains(&self, capability: &str) -> bool {
        self.entries.contains(capability)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn categories(&self) -> BTreeSet<&str> {
        self.iter().map(category_of).collect()
    }

    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.iter().filter(move |c| category_of(c) == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_category_splits_on_first_separator() {
        assert_eq!(derive_category("academic.edit_grades").unwrap(), "academic");
        assert_eq!(derive_category("a.b.c").unwrap(), "a");
        assert!(matches!(
            derive_category("nodot"),
            Err(AuthzError::MalformedCapability(c)) if c == "nodot"
        ));
    }

    #[test]
    fn test_validate_rejects_bad_shapes() {
        assert!(validate_capability("finance.pay_fees").is_ok());
        for bad in ["", "finance", ".pay", "finance.", "a.b.c"] {
            assert!(validate_capability(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_builtin_entries_are_well_formed_and_unique() {
        for capability in ALL {
            validate_capability(capability).unwrap();
        }
        assert_eq!(Catalog::builtin().len(), ALL.len());
    }

    #[test]
    fn test_categories_and_filter() {
        let catalog = Catalog::builtin();
        let categories = catalog.categories();
        assert!(categories.contains("academic"));
        assert!(categories.contains("system"));
        assert_eq!(categories.len(), 8);
        assert_eq!(catalog.in_category("calendar").count(), 3);
    }

    #[test]
    fn test_from_entries_validates() {
        assert!(Catalog::from_entries(["x.y", "bad"]).is_err());
        let catalog = Catalog::from_entries(["x.y", "x.y", "z.w"]).unwrap();
        assert_eq!(catalog.len(), 2);
    }
}
