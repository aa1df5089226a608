use std::collections::BTreeMap;

use super::catalog as cap;

/// Shown for capabilities without a description.
pub const UNDESCRIBED: &str = "No description available";

const BUILTIN: &[(&str, &str)] = &[
    (cap::ACADEMIC_VIEW_GRADES, "View student grades"),
    (cap::ACADEMIC_EDIT_GRADES, "Enter and modify student grades"),
    (cap::ACADEMIC_VIEW_ASSIGNMENTS, "View assignments and due dates"),
    (cap::ACADEMIC_CREATE_ASSIGNMENTS, "Create and publish assignments"),
    (cap::ACADEMIC_GRADE_ASSIGNMENTS, "Grade submitted assignments"),
    (cap::ACADEMIC_VIEW_TIMETABLE, "View class timetables"),
    (cap::ACADEMIC_MANAGE_TIMETABLE, "Create and change class timetables"),
    (cap::ACADEMIC_VIEW_CURRICULUM, "View the curriculum and syllabus"),
    (cap::ACADEMIC_MANAGE_CURRICULUM, "Edit the curriculum and syllabus"),
    (cap::ACADEMIC_VIEW_EXAM_RESULTS, "View examination results"),
    (cap::ACADEMIC_PUBLISH_EXAM_RESULTS, "Publish examination results"),
    (cap::ATTENDANCE_VIEW_OWN, "View your own attendance record"),
    (cap::ATTENDANCE_VIEW_CHILD, "View your child's attendance record"),
    (cap::ATTENDANCE_VIEW_CLASS, "View attendance for a class"),
    (cap::ATTENDANCE_MARK, "Mark daily attendance"),
    (cap::ATTENDANCE_EDIT, "Correct recorded attendance"),
    (cap::ATTENDANCE_VIEW_SCHOOL, "View school-wide attendance"),
    (cap::COMMUNICATION_VIEW_MESSAGES, "Read messages"),
    (cap::COMMUNICATION_SEND_MESSAGES, "Send messages"),
    (cap::COMMUNICATION_VIEW_ANNOUNCEMENTS, "Read school announcements"),
    (cap::COMMUNICATION_SEND_ANNOUNCEMENTS, "Post announcements"),
    (cap::COMMUNICATION_MANAGE_ANNOUNCEMENTS, "Edit or remove any announcement"),
    (cap::COMMUNICATION_CONTACT_PARENTS, "Contact parents directly"),
    (cap::COMMUNICATION_CONTACT_EDUCATORS, "Contact educators directly"),
    (cap::FINANCE_VIEW_FEES, "View fee statements"),
    (cap::FINANCE_PAY_FEES, "Pay school fees"),
    (cap::FINANCE_MANAGE_FEES, "Set fee structures and record payments"),
    (cap::FINANCE_VIEW_FINANCIAL_REPORTS, "View financial reports"),
    (cap::FINANCE_PROCESS_REFUNDS, "Process fee refunds"),
    (cap::REPORTS_VIEW_STUDENT_REPORTS, "View individual student reports"),
    (cap::REPORTS_VIEW_CLASS_REPORTS, "View class performance reports"),
    (cap::REPORTS_VIEW_SCHOOL_REPORTS, "View school performance reports"),
    (cap::REPORTS_GENERATE_REPORTS, "Generate new reports"),
    (cap::REPORTS_EXPORT_REPORTS, "Export reports"),
    (cap::USERS_VIEW_OWN_PROFILE, "View your own profile"),
    (cap::USERS_EDIT_OWN_PROFILE, "Edit your own profile"),
    (cap::USERS_VIEW_PROFILES, "View other users' profiles"),
    (cap::USERS_MANAGE_STUDENTS, "Enrol and manage students"),
    (cap::USERS_MANAGE_EDUCATORS, "Manage educator accounts"),
    (cap::USERS_MANAGE_PARENTS, "Manage parent accounts"),
    (cap::USERS_MANAGE_STAFF, "Manage support staff accounts"),
    (cap::USERS_ASSIGN_ROLES, "Assign roles to users"),
    (cap::CALENDAR_VIEW_EVENTS, "View the school calendar"),
    (cap::CALENDAR_CREATE_EVENTS, "Add events to the calendar"),
    (cap::CALENDAR_MANAGE_EVENTS, "Edit or cancel any calendar event"),
    (cap::SYSTEM_MANAGE_SETTINGS, "Change system settings"),
    (cap::SYSTEM_VIEW_AUDIT_LOGS, "View audit logs"),
    (cap::SYSTEM_MANAGE_INTEGRATIONS, "Configure external integrations"),
    (cap::SYSTEM_BACKUP_DATA, "Back up and restore school data"),
];

/// Display text per capability. Never consulted for decisions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptions {
    entries: BTreeMap<String, String>,
}

impl Descriptions {
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN
                .iter()
                .map(|(capability, text)| (capability.to_string(), text.to_string()))
                .collect(),
        }
    }

    pub fn insert(&mut self, capability: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(capability.into(), text.into());
    }

    pub fn describe(&self, capability: &str) -> &str {
        self.entries
            .get(capability)
            .map(String::as_str)
            .unwrap_or(UNDESCRIBED)
    }

    pub fn contains(&self, capability: &str) -> bool {
        self.entries.contains_key(capability)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(c, t)| (c.as_str(), t.as_str()))
    }
}
