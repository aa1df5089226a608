use std::collections::{BTreeMap, BTreeSet};

use super::catalog as cap;

static NO_CAPABILITIES: BTreeSet<String> = BTreeSet::new();

const BUILTIN: &[(&str, &[&str])] = &[
    ("grades", &[cap::ACADEMIC_VIEW_GRADES, cap::ACADEMIC_EDIT_GRADES]),
    (
        "assignments",
        &[
            cap::ACADEMIC_VIEW_ASSIGNMENTS,
            cap::ACADEMIC_CREATE_ASSIGNMENTS,
            cap::ACADEMIC_GRADE_ASSIGNMENTS,
        ],
    ),
    ("timetable", &[cap::ACADEMIC_VIEW_TIMETABLE, cap::ACADEMIC_MANAGE_TIMETABLE]),
    (
        "exam_results",
        &[cap::ACADEMIC_VIEW_EXAM_RESULTS, cap::ACADEMIC_PUBLISH_EXAM_RESULTS],
    ),
    (
        "attendance",
        &[
            cap::ATTENDANCE_VIEW_OWN,
            cap::ATTENDANCE_VIEW_CHILD,
            cap::ATTENDANCE_VIEW_CLASS,
            cap::ATTENDANCE_MARK,
            cap::ATTENDANCE_VIEW_SCHOOL,
        ],
    ),
    (
        "messaging",
        &[cap::COMMUNICATION_VIEW_MESSAGES, cap::COMMUNICATION_SEND_MESSAGES],
    ),
    (
        "announcements",
        &[
            cap::COMMUNICATION_VIEW_ANNOUNCEMENTS,
            cap::COMMUNICATION_SEND_ANNOUNCEMENTS,
            cap::COMMUNICATION_MANAGE_ANNOUNCEMENTS,
        ],
    ),
    (
        "payments",
        &[cap::FINANCE_VIEW_FEES, cap::FINANCE_PAY_FEES, cap::FINANCE_MANAGE_FEES],
    ),
    (
        "reports",
        &[
            cap::REPORTS_VIEW_STUDENT_REPORTS,
            cap::REPORTS_VIEW_CLASS_REPORTS,
            cap::REPORTS_VIEW_SCHOOL_REPORTS,
        ],
    ),
    (
        "user_management",
        &[
            cap::USERS_MANAGE_STUDENTS,
            cap::USERS_MANAGE_EDUCATORS,
            cap::USERS_MANAGE_PARENTS,
            cap::USERS_MANAGE_STAFF,
            cap::USERS_ASSIGN_ROLES,
        ],
    ),
    (
        "calendar",
        &[
            cap::CALENDAR_VIEW_EVENTS,
            cap::CALENDAR_CREATE_EVENTS,
            cap::CALENDAR_MANAGE_EVENTS,
        ],
    ),
    (
        "system_settings",
        &[cap::SYSTEM_MANAGE_SETTINGS, cap::SYSTEM_MANAGE_INTEGRATIONS],
    ),
    ("audit_logs", &[cap::SYSTEM_VIEW_AUDIT_LOGS]),
];

/// Feature name -> capabilities that unlock it. Access to a feature needs
/// any one of its capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureMap {
    features: BTreeMap<String, BTreeSet<String>>,
}

impl FeatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        BUILTIN
            .iter()
            .fold(Self::new(), |map, (name, caps)| map.with_feature(*name, caps.iter().copied()))
    }

    pub fn with_feature<I, S>(mut self, name: impl Into<String>, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features
            .entry(name.into())
            .or_default()
            .extend(capabilities.into_iter().map(Into::into));
        self
    }

    /// Capabilities for a feature. Unknown features map to the empty set,
    /// so nobody can access them.
    pub fn capabilities_for_feature(&self, feature: &str) -> &BTreeSet<String> {
        match self.features.get(feature) {
            Some(set) => set,
            None => {
                tracing::debug!(feature = %feature, "feature not in feature map");
                &NO_CAPABILITIES
            }
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.features.iter().map(|(name, set)| (name.as_str(), set))
    }
}
