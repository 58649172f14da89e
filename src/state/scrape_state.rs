/// Scrape state definitions for the paginated page loop
///
/// Pages are visited strictly in order. Each page goes through
/// `Fetch -> Extract -> Pace` before the next one is fetched; the loop ends
/// in one of the two terminal states.
use std::fmt;

/// Why a scrape ended
///
/// None of these is an error: the listings gathered so far are kept in
/// every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// Every requested page was processed
    Completed,

    /// The page could not be fetched
    FetchFailed { page: u32 },

    /// The page was fetched but held no listing cards
    EmptyPage { page: u32 },

    /// The caller cancelled before the page was fetched
    Cancelled { page: u32 },
}

impl StopReason {
    /// Returns true if all requested pages were processed
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// The page at which the loop stopped early, if any
    pub fn page(&self) -> Option<u32> {
        match self {
            Self::Completed => None,
            Self::FetchFailed { page } | Self::EmptyPage { page } | Self::Cancelled { page } => {
                Some(*page)
            }
        }
    }

    /// Short machine-readable label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::FetchFailed { .. } => "fetch_failed",
            Self::EmptyPage { .. } => "empty_page",
            Self::Cancelled { .. } => "cancelled",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.page() {
            Some(page) => write!(f, "{} (page {})", self.as_str(), page),
            None => write!(f, "{}", self.as_str()),
        }
    }
}

/// Represents the current state of the page loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrapeState {
    // ===== Active States =====
    /// Page is about to be requested
    Fetch(u32),

    /// Page was fetched and its listings are being collected
    Extract(u32),

    /// Waiting before the next page request
    Pace(u32),

    // ===== Terminal States =====
    /// All pages were processed
    Done,

    /// The loop ended early
    Stopped(StopReason),
}

impl ScrapeState {
    /// Returns true if the loop has ended
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Stopped(_))
    }

    /// The page this state refers to, if any
    pub fn page(&self) -> Option<u32> {
        match self {
            Self::Fetch(page) | Self::Extract(page) | Self::Pace(page) => Some(*page),
            Self::Done => None,
            Self::Stopped(reason) => reason.page(),
        }
    }

    /// Maps a terminal state to its stop reason
    pub fn stop_reason(&self) -> Option<StopReason> {
        match self {
            Self::Done => Some(StopReason::Completed),
            Self::Stopped(reason) => Some(*reason),
            _ => None,
        }
    }

    /// Initial state for a scrape of `max_pages` pages
    pub fn initial(max_pages: u32) -> Self {
        if max_pages == 0 {
            Self::Done
        } else {
            Self::Fetch(1)
        }
    }
}

impl fmt::Display for ScrapeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(page) => write!(f, "fetch({})", page),
            Self::Extract(page) => write!(f, "extract({})", page),
            Self::Pace(page) => write!(f, "pace({})", page),
            Self::Done => write!(f, "done"),
            Self::Stopped(reason) => write!(f, "stopped: {}", reason),
        }
    }
}
