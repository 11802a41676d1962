use leptos::prelude::*;

/// Outcome of a single health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Fail,
    Unknown,
}

impl CheckStatus {
    /// `None` means the probe has not answered yet.
    pub fn from_result(passed: Option<bool>) -> Self {
        match passed {
            Some(true) => CheckStatus::Pass,
            Some(false) => CheckStatus::Fail,
            None => CheckStatus::Unknown,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            CheckStatus::Pass => "\u{2713}",
            CheckStatus::Fail => "\u{2717}",
            CheckStatus::Unknown => "?",
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            CheckStatus::Pass => "status-badge status-pass",
            CheckStatus::Fail => "status-badge status-fail",
            CheckStatus::Unknown => "status-badge status-unknown",
        }
    }
}

#[component]
pub fn StatusBadge(
    /// The label text, e.g. "API Server"
    #[prop(into)]
    label: String,
    status: CheckStatus,
    /// Optional detail text, e.g. the database state
    #[prop(optional, into)]
    detail: Option<String>,
) -> impl IntoView {
    view! {
        <div class="health-item">
            <span class=status.class()>{status.icon()}</span>
            <span class="health-name">{label}</span>
            <span class="health-detail">{detail.unwrap_or_default()}</span>
        </div>
    }
}
