//! Solution persona catalog.
//!
//! Each persona is a role at a school with its own solutions page at
//! `#/solutions/<slug>`. The router passes the slug through untouched;
//! [`persona`] is where an unknown slug is caught.

use serde::Serialize;

/// A role the product is pitched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Persona {
    pub slug: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub one_liner: &'static str,
    pub pains: &'static [&'static str],
    pub stats: &'static [&'static str],
    pub features: &'static [&'static str],
}

/// Every persona, in the order the solutions index lists them.
pub const PERSONAS: [Persona; 15] = [
    Persona {
        slug: "principal",
        title: "Principal / Head Teacher",
        subtitle: "Full school oversight",
        one_liner: "Run your entire school from one dashboard. Track everything that matters.",
        pains: &["Scattered reports", "Manual timetables", "Late submissions"],
        stats: &["1-click reports", "Complete oversight"],
        features: &[
            "Curriculum planning",
            "Assessment tracking",
            "Staff management",
            "Parent communication",
            "Attendance oversight",
            "Automated reports",
        ],
    },
    Persona {
        slug: "deputy-principal",
        title: "Deputy Principal",
        subtitle: "Academic programs",
        one_liner: "Focus on academics. Monitor teaching quality. Drive results.",
        pains: &["Assessment chaos", "Curriculum gaps", "Teacher coordination"],
        stats: &["Academic oversight", "Quality assurance"],
        features: &[
            "Curriculum monitoring",
            "Teacher observations",
            "Assessment analysis",
            "Timetable management",
            "Academic reporting",
            "Standards tracking",
        ],
    },
    Persona {
        slug: "ict-manager",
        title: "ICT Manager",
        subtitle: "System administration",
        one_liner: "Control access, data, and integrations. Keep everything running.",
        pains: &["User sprawl", "Permissions chaos", "Integration issues"],
        stats: &["Role-based access", "Audit-ready"],
        features: &[
            "User management",
            "Role permissions",
            "System configuration",
            "Data exports",
            "Audit logs",
            "Integration setup",
        ],
    },
    Persona {
        slug: "registrar",
        title: "Registrar",
        subtitle: "Admissions & enrollment",
        one_liner: "Streamline admissions. Manage records. Track enrollment.",
        pains: &["Paper applications", "Manual tracking", "Lost documents"],
        stats: &["Digital admissions", "Paperless records"],
        features: &[
            "Online applications",
            "Document management",
            "Enrollment tracking",
            "Student records",
            "Registration workflows",
            "Compliance reports",
        ],
    },
    Persona {
        slug: "bursar",
        title: "Bursar",
        subtitle: "Fees & payments",
        one_liner: "Track fees. Manage payments. Reduce arrears.",
        pains: &["Fee confusion", "Payment tracking", "Arrears follow-up"],
        stats: &["Real-time balances", "Automated reminders"],
        features: &[
            "Fee management",
            "Payment tracking",
            "Invoice generation",
            "Receipt printing",
            "Arrears reports",
            "Financial analytics",
        ],
    },
    Persona {
        slug: "procurement",
        title: "Procurement Officer",
        subtitle: "Purchasing & vendors",
        one_liner: "Manage orders. Track vendors. Control spending.",
        pains: &["Manual requisitions", "Vendor chaos", "Budget overruns"],
        stats: &["Digital procurement", "Vendor portal"],
        features: &[
            "Purchase requests",
            "Vendor management",
            "Budget tracking",
            "Order approvals",
            "Inventory control",
            "Spend analytics",
        ],
    },
    Persona {
        slug: "hr-manager",
        title: "HR Manager",
        subtitle: "Staff & payroll",
        one_liner: "Manage staff. Run payroll. Track performance.",
        pains: &["Manual payroll", "Leave tracking", "Performance gaps"],
        stats: &["Automated payroll", "Digital leave"],
        features: &[
            "Staff records",
            "Payroll processing",
            "Leave management",
            "Performance reviews",
            "Contract tracking",
            "HR analytics",
        ],
    },
    Persona {
        slug: "transport",
        title: "Transport Manager",
        subtitle: "Fleet & GPS tracking",
        one_liner: "Track vehicles. Manage routes. Ensure safety.",
        pains: &["Route chaos", "Vehicle tracking", "Parent complaints"],
        stats: &["GPS tracking", "Route optimization"],
        features: &[
            "Vehicle tracking",
            "Route management",
            "Driver scheduling",
            "Maintenance logs",
            "Parent notifications",
            "Safety reports",
        ],
    },
    Persona {
        slug: "librarian",
        title: "Librarian",
        subtitle: "Library management",
        one_liner: "Catalog books. Track loans. Engage readers.",
        pains: &["Manual cataloging", "Lost books", "Overdue tracking"],
        stats: &["Digital catalog", "Automated reminders"],
        features: &[
            "Book cataloging",
            "Loan management",
            "Digital library",
            "Reading analytics",
            "Overdue tracking",
            "Collection reports",
        ],
    },
    Persona {
        slug: "boarding",
        title: "Boarding Master",
        subtitle: "Houses & exeats",
        one_liner: "Manage houses. Track exeats. Ensure pastoral care.",
        pains: &["Exeat tracking", "House management", "Parent approvals"],
        stats: &["Digital exeats", "House oversight"],
        features: &[
            "House management",
            "Exeat requests",
            "Roll call tracking",
            "Pastoral records",
            "Parent approvals",
            "Boarding analytics",
        ],
    },
    Persona {
        slug: "class-teacher",
        title: "Class Teacher",
        subtitle: "Homeroom & pastoral care",
        one_liner: "Know your class. Track wellbeing. Support every learner.",
        pains: &["Pastoral tracking", "Parent communication", "Wellbeing gaps"],
        stats: &["Class insights", "Pastoral notes"],
        features: &[
            "Class overview",
            "Attendance tracking",
            "Pastoral notes",
            "Parent messaging",
            "Wellbeing tracking",
            "Class reports",
        ],
    },
    Persona {
        slug: "subject-teacher",
        title: "Subject Teacher",
        subtitle: "Specialized subjects",
        one_liner: "Teach your subject. Grade faster. Share resources.",
        pains: &["Paper marking", "Resource chaos", "Progress tracking"],
        stats: &["50% faster grading", "Digital resources"],
        features: &[
            "Digital gradebook",
            "Lesson planning",
            "Assignment management",
            "Resource library",
            "Assessment tools",
            "Subject analytics",
        ],
    },
    Persona {
        slug: "eca-coach",
        title: "ECA Coach",
        subtitle: "Sports & activities",
        one_liner: "Manage teams. Track events. Celebrate achievements.",
        pains: &["Team coordination", "Event scheduling", "Achievement tracking"],
        stats: &["Digital rosters", "Event calendar"],
        features: &[
            "Team management",
            "Event scheduling",
            "Attendance tracking",
            "Achievement records",
            "Parent notifications",
            "Competition tracking",
        ],
    },
    Persona {
        slug: "student",
        title: "Student",
        subtitle: "Grades & assignments",
        one_liner: "Learn anywhere. Submit work. Check progress.",
        pains: &["Unclear tasks", "Scattered links", "Late feedback"],
        stats: &["Mobile-first LMS", "Clear to-dos"],
        features: &[
            "Assignment dashboard",
            "Grade visibility",
            "Digital submissions",
            "Learning resources",
            "Progress tracking",
            "Mobile access",
        ],
    },
    Persona {
        slug: "parent",
        title: "Parent / Guardian",
        subtitle: "Track child's progress",
        one_liner: "See grades. Pay fees. Talk to teachers. Stay connected.",
        pains: &["Fee confusion", "Hard to reach teachers", "No visibility"],
        stats: &["Fee portal", "Real-time updates"],
        features: &[
            "Grade tracking",
            "Fee payment",
            "Teacher messaging",
            "Attendance alerts",
            "Event calendar",
            "Mobile app",
        ],
    },
];

/// Persona shown by default in the dashboard preview.
pub const DEFAULT_PREVIEW_SLUG: &str = "subject-teacher";

/// Look up a persona by slug. Slugs are matched exactly.
#[must_use]
pub fn persona(slug: &str) -> Option<&'static Persona> {
    PERSONAS.iter().find(|p| p.slug == slug)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    fn solution(slug: &str) -> View {
        View::Solution {
            slug: slug.to_owned(),
        }
    }

    use super::*;
    use crate::route::Route;
    use crate::view::View;

    #[test]
    fn slugs_are_unique() {
        let slugs: HashSet<_> = PERSONAS.iter().map(|p| p.slug).collect();
        assert_eq!(slugs.len(), PERSONAS.len());
    }

    #[test]
    fn lookup_is_exact() {
        assert_eq!(persona("bursar").map(|p| p.title), Some("Bursar"));
        assert!(persona("Bursar").is_none());
        assert!(persona("").is_none());
        assert!(persona("dean").is_none());
    }

    #[test]
    fn default_preview_persona_exists() {
        assert!(persona(DEFAULT_PREVIEW_SLUG).is_some());
    }

    #[test]
    fn every_persona_page_routes_to_its_slug() {
        for p in &PERSONAS {
            let view = View::select(&Route::parse(&format!("#/solutions/{}", p.slug)));
            assert_eq!(view, solution(p.slug));
        }
    }
}
