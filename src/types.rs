/// Shared domain enumerations used across the codebase
///
/// Status/type values are stored as plain text columns; these enums are the
/// single source of truth for which values are valid per resource. Query
/// filters only apply a status/type condition when the raw value parses here.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectStatus {
    Active,
    Completed,
    Pending,
    Cancelled,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::Active,
        ProjectStatus::Completed,
        ProjectStatus::Pending,
        ProjectStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Pending => "pending",
            ProjectStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Active,
    Testing,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Active,
        TaskStatus::Testing,
        TaskStatus::Completed,
        TaskStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Active => "active",
            TaskStatus::Testing => "testing",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == s)
    }
}

/// Project categories ("frontend", "backend", ...) selectable at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    Frontend,
    Backend,
    Mobile,
    Desktop,
    Monitor,
    Tool,
    Etc,
}

impl ProjectKind {
    pub const ALL: [ProjectKind; 7] = [
        ProjectKind::Frontend,
        ProjectKind::Backend,
        ProjectKind::Mobile,
        ProjectKind::Desktop,
        ProjectKind::Monitor,
        ProjectKind::Tool,
        ProjectKind::Etc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectKind::Frontend => "frontend",
            ProjectKind::Backend => "backend",
            ProjectKind::Mobile => "mobile",
            ProjectKind::Desktop => "desktop",
            ProjectKind::Monitor => "monitor",
            ProjectKind::Tool => "tool",
            ProjectKind::Etc => "etc",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleKind {
    Meeting,
    Discussion,
    Review,
    Presentation,
    Etc,
}

impl ScheduleKind {
    pub const ALL: [ScheduleKind; 5] = [
        ScheduleKind::Meeting,
        ScheduleKind::Discussion,
        ScheduleKind::Review,
        ScheduleKind::Presentation,
        ScheduleKind::Etc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleKind::Meeting => "meeting",
            ScheduleKind::Discussion => "discussion",
            ScheduleKind::Review => "review",
            ScheduleKind::Presentation => "presentation",
            ScheduleKind::Etc => "etc",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Maintainer,
    Developer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Maintainer => "maintainer",
            Role::Developer => "developer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "maintainer" => Some(Role::Maintainer),
            "developer" => Some(Role::Developer),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn is_admin_or_maintainer(&self) -> bool {
        matches!(self, Role::Admin | Role::Maintainer)
    }
}

/// Job positions selectable on a user profile. Free-form enough that an enum
/// would churn constantly; validated against this list instead.
pub const POSITIONS: &[&str] = &[
    "Chief Executive Officer (CEO)",
    "Chief Data and Business Officer (CDBO)",
    "Chief Technology Officer (CTO)",
    "Chief Operating Officer (COO)",
    "HR/GA Manager",
    "Lead of Engineering",
    "Lead of Business and Analytics",
    "Lead of Content Analyst",
    "HR/GA Officer",
    "Frontend Engineer",
    "Backend Engineer",
    "Quality Assurance Engineer",
    "DevOps Engineer",
    "Crawler Engineer",
    "Technical Support Engineer",
    "UI/UX Engineer",
    "Data Scientist",
    "Business Development",
    "Customer Support",
    "Social Media Specialist",
    "Social Media Admin",
    "Graphic Designer",
    "Video Editor",
    "Content Analyst",
    "Other",
];

pub fn is_valid_position(position: &str) -> bool {
    POSITIONS.contains(&position)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrip() {
        for s in ProjectStatus::ALL {
            assert_eq!(ProjectStatus::parse(s.as_str()), Some(s));
        }
        for s in TaskStatus::ALL {
            assert_eq!(TaskStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(ProjectStatus::parse("bogus"), None);
        assert_eq!(TaskStatus::parse("pending"), None);
    }

    #[test]
    fn kind_roundtrip() {
        for k in ScheduleKind::ALL {
            assert_eq!(ScheduleKind::parse(k.as_str()), Some(k));
        }
        for k in ProjectKind::ALL {
            assert_eq!(ProjectKind::parse(k.as_str()), Some(k));
        }
        assert_eq!(ScheduleKind::parse("standup"), None);
    }

    #[test]
    fn roles() {
        assert!(Role::Admin.is_admin());
        assert!(Role::Maintainer.is_admin_or_maintainer());
        assert!(!Role::Developer.is_admin_or_maintainer());
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("root"), None);
    }

    #[test]
    fn positions_contain_default() {
        assert!(is_valid_position("Other"));
        assert!(!is_valid_position("Wizard"));
    }
}
