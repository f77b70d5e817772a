/// Label used for the report root and for every variation's resource element.
pub const PROJECT_LABEL: &str = "DalekJSTest";

/// Root of the report tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub name: String,
    pub suites: Vec<Suite>,
}

impl Default for Report {
    fn default() -> Self {
        Self {
            name: PROJECT_LABEL.to_string(),
            suites: Vec::new(),
        }
    }
}

/// One suite run against one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suite {
    pub start: u64,
    pub end: Option<u64>,
    /// Suite name followed by the target in brackets.
    pub name: String,
    pub total_tests: usize,
    pub cases: Vec<Case>,
}

impl Suite {
    pub fn open(name: String, start: u64) -> Self {
        Self {
            start,
            end: None,
            name,
            total_tests: 0,
            cases: Vec::new(),
        }
    }
}

/// One test inside a suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    pub start: u64,
    pub end: Option<u64>,
    pub name: String,
    pub result: Option<CaseResult>,
    pub variations: Vec<Variation>,
}

impl Case {
    pub fn open(name: String, start: u64) -> Self {
        Self {
            start,
            end: None,
            name,
            result: None,
            variations: Vec::new(),
        }
    }
}

/// Outcome of a finished test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseResult {
    Passed,
    Failed,
}

impl CaseResult {
    pub fn from_status(status: bool) -> Self {
        if status { Self::Passed } else { Self::Failed }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "Passed",
            Self::Failed => "Failed",
        }
    }
}

/// One assertion inside a test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variation {
    pub start: u64,
    pub end: Option<u64>,
    /// Assertion kind reported by the runner (e.g. `val`, `title`).
    pub name: String,
    pub severity: Severity,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Pass,
    Fail,
}

impl Severity {
    pub fn from_success(success: bool) -> Self {
        if success { Self::Pass } else { Self::Fail }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
        }
    }
}

/// Run-level totals reported with `report:runner:finished`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub elapsed_time: serde_json::Value,
    pub status: bool,
    pub assertions: u64,
    pub assertions_failed: u64,
    pub assertions_passed: u64,
}
