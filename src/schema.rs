/// Column-name constants for the employee table.
/// Single source of truth - exported to Python via PyO3.

// ── Canonical employee columns ──────────────────────────────────────────────
pub mod employee {
    pub const ATTRITION: &str = "attrition";
    pub const DEPARTMENT: &str = "department";
    pub const MONTHLY_SALARY: &str = "monthly_salary";
    pub const JOB_ROLE: &str = "job_role";
    pub const OVERTIME: &str = "overtime";
    pub const TRAVEL_FREQUENCY: &str = "travel_frequency";
    pub const JOB_SATISFACTION: &str = "job_satisfaction";
    pub const AGE: &str = "age";
    pub const GENDER: &str = "gender";
    pub const YEARS_AT_COMPANY: &str = "years_at_company";
}

// ── Source headers accepted for each canonical column ───────────────────────
pub mod legacy {
    pub const ATTRITION: [&str; 4] = ["離職", "流失", "是否離職", "Attrition"];
    pub const DEPARTMENT: [&str; 2] = ["部門", "Department"];
    pub const MONTHLY_SALARY: [&str; 4] = ["月薪", "月收入", "MonthlyIncome", "Monthly Salary"];
    pub const JOB_ROLE: [&str; 3] = ["職位", "職務", "JobRole"];
    pub const OVERTIME: [&str; 3] = ["加班", "是否加班", "OverTime"];
    pub const TRAVEL_FREQUENCY: [&str; 2] = ["出差頻率", "BusinessTravel"];
    pub const JOB_SATISFACTION: [&str; 2] = ["工作滿意度", "JobSatisfaction"];
    pub const AGE: [&str; 2] = ["年齡", "Age"];
    pub const GENDER: [&str; 2] = ["性別", "Gender"];
    pub const YEARS_AT_COMPANY: [&str; 3] = ["年資", "在職年資", "YearsAtCompany"];
}

// ── Normalized cell values ──────────────────────────────────────────────────
pub mod flag {
    pub const YES: &str = "yes";
    pub const NO: &str = "no";
    pub const ALL: &str = "all";

    pub const YES_SYNONYMS: [&str; 5] = ["yes", "y", "true", "1", "是"];
    pub const NO_SYNONYMS: [&str; 5] = ["no", "n", "false", "0", "否"];
}

pub mod gender {
    pub const MALE: &str = "male";
    pub const FEMALE: &str = "female";

    pub const MALE_SYNONYMS: [&str; 3] = ["male", "m", "男"];
    pub const FEMALE_SYNONYMS: [&str; 3] = ["female", "f", "女"];
}

// ── Attrition colors (shared by every chart) ────────────────────────────────
pub mod palette {
    pub const YES: &str = "#FF6B6B";
    pub const NO: &str = "#4ECDC4";
}

// ── Aggregated dataset columns ──────────────────────────────────────────────
pub mod chart {
    pub const COUNT: &str = "count";
}

/// Job satisfaction is recorded on a 1..=4 scale.
pub const SATISFACTION_SCALE: (i64, i64) = (1, 4);

/// How raw cells of an attribute are normalized on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Free-form category, whitespace trimmed.
    Label,
    /// Binary yes/no flag.
    Flag,
    /// male/female.
    Sex,
    /// Whole number.
    Integer,
}

/// Canonical attributes of an employee record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    Attrition,
    Department,
    MonthlySalary,
    JobRole,
    Overtime,
    TravelFrequency,
    JobSatisfaction,
    Age,
    Gender,
    YearsAtCompany,
}

impl Attribute {
    pub const ALL: [Attribute; 10] = [
        Attribute::Attrition,
        Attribute::Department,
        Attribute::MonthlySalary,
        Attribute::JobRole,
        Attribute::Overtime,
        Attribute::TravelFrequency,
        Attribute::JobSatisfaction,
        Attribute::Age,
        Attribute::Gender,
        Attribute::YearsAtCompany,
    ];

    pub const REQUIRED: [Attribute; 3] = [
        Attribute::Attrition,
        Attribute::Department,
        Attribute::MonthlySalary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Attribute::Attrition => employee::ATTRITION,
            Attribute::Department => employee::DEPARTMENT,
            Attribute::MonthlySalary => employee::MONTHLY_SALARY,
            Attribute::JobRole => employee::JOB_ROLE,
            Attribute::Overtime => employee::OVERTIME,
            Attribute::TravelFrequency => employee::TRAVEL_FREQUENCY,
            Attribute::JobSatisfaction => employee::JOB_SATISFACTION,
            Attribute::Age => employee::AGE,
            Attribute::Gender => employee::GENDER,
            Attribute::YearsAtCompany => employee::YEARS_AT_COMPANY,
        }
    }

    /// Source headers that are renamed to this attribute, in priority order.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Attribute::Attrition => &legacy::ATTRITION,
            Attribute::Department => &legacy::DEPARTMENT,
            Attribute::MonthlySalary => &legacy::MONTHLY_SALARY,
            Attribute::JobRole => &legacy::JOB_ROLE,
            Attribute::Overtime => &legacy::OVERTIME,
            Attribute::TravelFrequency => &legacy::TRAVEL_FREQUENCY,
            Attribute::JobSatisfaction => &legacy::JOB_SATISFACTION,
            Attribute::Age => &legacy::AGE,
            Attribute::Gender => &legacy::GENDER,
            Attribute::YearsAtCompany => &legacy::YEARS_AT_COMPANY,
        }
    }

    pub fn kind(self) -> ValueKind {
        match self {
            Attribute::Attrition | Attribute::Overtime => ValueKind::Flag,
            Attribute::Gender => ValueKind::Sex,
            Attribute::MonthlySalary
            | Attribute::JobSatisfaction
            | Attribute::Age
            | Attribute::YearsAtCompany => ValueKind::Integer,
            Attribute::Department | Attribute::JobRole | Attribute::TravelFrequency => {
                ValueKind::Label
            }
        }
    }

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }

    /// True when `header` names this attribute, either canonically or via an alias.
    /// ASCII headers match case-insensitively.
    pub fn matches_header(self, header: &str) -> bool {
        let header = header.trim();
        header.eq_ignore_ascii_case(self.name())
            || self
                .aliases()
                .iter()
                .any(|alias| header.eq_ignore_ascii_case(alias))
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
