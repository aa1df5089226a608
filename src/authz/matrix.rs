use std::collections::{BTreeMap, BTreeSet};

use super::catalog::{self as cap, Catalog};
use super::roles::Role;

static NO_CAPABILITIES: BTreeSet<String> = BTreeSet::new();

const PARENT: &[&str] = &[
    cap::ACADEMIC_VIEW_GRADES,
    cap::ACADEMIC_VIEW_ASSIGNMENTS,
    cap::ACADEMIC_VIEW_TIMETABLE,
    cap::ACADEMIC_VIEW_EXAM_RESULTS,
    cap::ATTENDANCE_VIEW_CHILD,
    cap::COMMUNICATION_VIEW_MESSAGES,
    cap::COMMUNICATION_SEND_MESSAGES,
    cap::COMMUNICATION_VIEW_ANNOUNCEMENTS,
    cap::COMMUNICATION_CONTACT_EDUCATORS,
    cap::FINANCE_VIEW_FEES,
    cap::FINANCE_PAY_FEES,
    cap::REPORTS_VIEW_STUDENT_REPORTS,
    cap::USERS_VIEW_OWN_PROFILE,
    cap::USERS_EDIT_OWN_PROFILE,
    cap::CALENDAR_VIEW_EVENTS,
];

const STUDENT: &[&str] = &[
    cap::ACADEMIC_VIEW_GRADES,
    cap::ACADEMIC_VIEW_ASSIGNMENTS,
    cap::ACADEMIC_VIEW_TIMETABLE,
    cap::ACADEMIC_VIEW_CURRICULUM,
    cap::ACADEMIC_VIEW_EXAM_RESULTS,
    cap::ATTENDANCE_VIEW_OWN,
    cap::COMMUNICATION_VIEW_MESSAGES,
    cap::COMMUNICATION_SEND_MESSAGES,
    cap::COMMUNICATION_VIEW_ANNOUNCEMENTS,
    cap::FINANCE_VIEW_FEES,
    cap::REPORTS_VIEW_STUDENT_REPORTS,
    cap::USERS_VIEW_OWN_PROFILE,
    cap::USERS_EDIT_OWN_PROFILE,
    cap::CALENDAR_VIEW_EVENTS,
];

const EDUCATOR: &[&str] = &[
    cap::ACADEMIC_VIEW_GRADES,
    cap::ACADEMIC_EDIT_GRADES,
    cap::ACADEMIC_VIEW_ASSIGNMENTS,
    cap::ACADEMIC_CREATE_ASSIGNMENTS,
    cap::ACADEMIC_GRADE_ASSIGNMENTS,
    cap::ACADEMIC_VIEW_TIMETABLE,
    cap::ACADEMIC_VIEW_CURRICULUM,
    cap::ACADEMIC_VIEW_EXAM_RESULTS,
    cap::ATTENDANCE_VIEW_CLASS,
    cap::ATTENDANCE_MARK,
    cap::ATTENDANCE_EDIT,
    cap::COMMUNICATION_VIEW_MESSAGES,
    cap::COMMUNICATION_SEND_MESSAGES,
    cap::COMMUNICATION_VIEW_ANNOUNCEMENTS,
    cap::COMMUNICATION_SEND_ANNOUNCEMENTS,
    cap::COMMUNICATION_CONTACT_PARENTS,
    cap::COMMUNICATION_CONTACT_EDUCATORS,
    cap::REPORTS_VIEW_STUDENT_REPORTS,
    cap::REPORTS_VIEW_CLASS_REPORTS,
    cap::REPORTS_GENERATE_REPORTS,
    cap::USERS_VIEW_OWN_PROFILE,
    cap::USERS_EDIT_OWN_PROFILE,
    cap::USERS_VIEW_PROFILES,
    cap::CALENDAR_VIEW_EVENTS,
    cap::CALENDAR_CREATE_EVENTS,
];

const MANAGEMENT: &[&str] = &[
    cap::ACADEMIC_VIEW_GRADES,
    cap::ACADEMIC_VIEW_ASSIGNMENTS,
    cap::ACADEMIC_VIEW_TIMETABLE,
    cap::ACADEMIC_MANAGE_TIMETABLE,
    cap::ACADEMIC_VIEW_CURRICULUM,
    cap::ACADEMIC_VIEW_EXAM_RESULTS,
    cap::ATTENDANCE_VIEW_CLASS,
    cap::ATTENDANCE_VIEW_SCHOOL,
    cap::COMMUNICATION_VIEW_MESSAGES,
    cap::COMMUNICATION_SEND_MESSAGES,
    cap::COMMUNICATION_VIEW_ANNOUNCEMENTS,
    cap::COMMUNICATION_SEND_ANNOUNCEMENTS,
    cap::COMMUNICATION_MANAGE_ANNOUNCEMENTS,
    cap::COMMUNICATION_CONTACT_PARENTS,
    cap::COMMUNICATION_CONTACT_EDUCATORS,
    cap::FINANCE_VIEW_FEES,
    cap::FINANCE_VIEW_FINANCIAL_REPORTS,
    cap::REPORTS_VIEW_STUDENT_REPORTS,
    cap::REPORTS_VIEW_CLASS_REPORTS,
    cap::REPORTS_VIEW_SCHOOL_REPORTS,
    cap::REPORTS_GENERATE_REPORTS,
    cap::REPORTS_EXPORT_REPORTS,
    cap::USERS_VIEW_OWN_PROFILE,
    cap::USERS_EDIT_OWN_PROFILE,
    cap::USERS_VIEW_PROFILES,
    cap::USERS_MANAGE_STUDENTS,
    cap::USERS_MANAGE_PARENTS,
    cap::CALENDAR_VIEW_EVENTS,
    cap::CALENDAR_CREATE_EVENTS,
    cap::CALENDAR_MANAGE_EVENTS,
];

// Added on top of MANAGEMENT.
const SENIOR_MANAGEMENT_EXTRA: &[&str] = &[
    cap::ACADEMIC_MANAGE_CURRICULUM,
    cap::ACADEMIC_PUBLISH_EXAM_RESULTS,
    cap::FINANCE_MANAGE_FEES,
    cap::USERS_MANAGE_EDUCATORS,
    cap::USERS_MANAGE_STAFF,
    cap::SYSTEM_VIEW_AUDIT_LOGS,
];

// Added on top of SENIOR_MANAGEMENT.
const PRINCIPAL_EXTRA: &[&str] = &[
    cap::ACADEMIC_EDIT_GRADES,
    cap::ATTENDANCE_EDIT,
    cap::FINANCE_PROCESS_REFUNDS,
    cap::USERS_ASSIGN_ROLES,
];

const SENIOR_SUPPORT_STAFF: &[&str] = &[
    cap::ATTENDANCE_VIEW_SCHOOL,
    cap::COMMUNICATION_VIEW_MESSAGES,
    cap::COMMUNICATION_SEND_MESSAGES,
    cap::COMMUNICATION_VIEW_ANNOUNCEMENTS,
    cap::COMMUNICATION_SEND_ANNOUNCEMENTS,
    cap::FINANCE_VIEW_FEES,
    cap::FINANCE_MANAGE_FEES,
    cap::FINANCE_VIEW_FINANCIAL_REPORTS,
    cap::FINANCE_PROCESS_REFUNDS,
    cap::REPORTS_VIEW_SCHOOL_REPORTS,
    cap::USERS_VIEW_OWN_PROFILE,
    cap::USERS_EDIT_OWN_PROFILE,
    cap::USERS_VIEW_PROFILES,
    cap::CALENDAR_VIEW_EVENTS,
    cap::CALENDAR_CREATE_EVENTS,
];

const SUPPORT_STAFF: &[&str] = &[
    cap::COMMUNICATION_VIEW_MESSAGES,
    cap::COMMUNICATION_SEND_MESSAGES,
    cap::COMMUNICATION_VIEW_ANNOUNCEMENTS,
    cap::FINANCE_VIEW_FEES,
    cap::USERS_VIEW_OWN_PROFILE,
    cap::USERS_EDIT_OWN_PROFILE,
    cap::CALENDAR_VIEW_EVENTS,
];

/// Role -> capability set. Total over all role ids: unmapped roles get
/// the empty set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleMatrix {
    grants: BTreeMap<Role, BTreeSet<String>>,
}

impl RoleMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in school matrix. The administrator is granted the whole
    /// catalog it is built against.
    pub fn builtin(catalog: &Catalog) -> Self {
        let senior: Vec<&str> = MANAGEMENT.iter().chain(SENIOR_MANAGEMENT_EXTRA).copied().collect();
        let principal: Vec<&str> = senior.iter().chain(PRINCIPAL_EXTRA).copied().collect();

        Self::new()
            .with_grant(Role::PARENT, PARENT.iter().copied())
            .with_grant(Role::STUDENT, STUDENT.iter().copied())
            .with_grant(Role::EDUCATOR, EDUCATOR.iter().copied())
            .with_grant(Role::MANAGEMENT, MANAGEMENT.iter().copied())
            .with_grant(Role::SENIOR_MANAGEMENT, senior)
            .with_grant(Role::PRINCIPAL, principal)
            .with_grant(Role::SENIOR_SUPPORT_STAFF, SENIOR_SUPPORT_STAFF.iter().copied())
            .with_grant(Role::SUPPORT_STAFF, SUPPORT_STAFF.iter().copied())
            .with_grant(Role::ADMIN, catalog.iter())
    }

    pub fn with_grant<I, S>(mut self, role: Role, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grants
            .entry(role)
            .or_default()
            .extend(capabilities.into_iter().map(Into::into));
        self
    }

    pub fn capabilities_for_role(&self, role: Role) -> &BTreeSet<String> {
        match self.grants.get(&role) {
            Some(set) => set,
            None => {
                tracing::debug!(role = %role, "role not in matrix, resolving to no capabilities");
                &NO_CAPABILITIES
            }
        }
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.grants.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &BTreeSet<String>)> {
        self.grants.iter().map(|(role, set)| (*role, set))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_holds_full_catalog() {
        let catalog = Catalog::builtin();
        let matrix = RoleMatrix::builtin(&catalog);
        let admin: Vec<&str> = matrix.capabilities_for_role(Role::ADMIN).iter().map(String::as_str).collect();
        let all: Vec<&str> = catalog.iter().collect();
        assert_eq!(admin, all);
    }

    #[test]
    fn test_unknown_role_is_empty() {
        let matrix = RoleMatrix::builtin(&Catalog::builtin());
        assert!(matrix.capabilities_for_role(Role(999)).is_empty());
        assert!(matrix.capabilities_for_role(Role(-1)).is_empty());
    }

    #[test]
    fn test_management_tiers_are_nested() {
        let matrix = RoleMatrix::builtin(&Catalog::builtin());
        let management = matrix.capabilities_for_role(Role::MANAGEMENT);
        let senior = matrix.capabilities_for_role(Role::SENIOR_MANAGEMENT);
        let principal = matrix.capabilities_for_role(Role::PRINCIPAL);
        assert!(management.is_subset(senior));
        assert!(senior.is_subset(principal));
        assert!(principal.contains(cap::USERS_ASSIGN_ROLES));
        assert!(!senior.contains(cap::USERS_ASSIGN_ROLES));
    }

    #[test]
    fn test_every_known_role_is_mapped() {
        let matrix = RoleMatrix::builtin(&Catalog::builtin());
        for role in Role::KNOWN {
            assert!(!matrix.capabilities_for_role(*role).is_empty(), "{role} has no grants");
        }
    }
}
