//! Domain state enums
//!
//! Internal state is always canonical; the historically observed
//! synonym spellings (including the French ones the mobile clients
//! still send) are translated at the HTTP boundary via `parse_*`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller role recognized by the authorization layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Client,
    Guest,
    Server,
    Chef,
    Manager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Guest => "guest",
            Self::Server => "server",
            Self::Chef => "chef",
            Self::Manager => "manager",
        }
    }

    /// Parse a role claim, accepting the legacy French staff spellings
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "client" => Some(Self::Client),
            "guest" | "invite" => Some(Self::Guest),
            "server" | "serveur" => Some(Self::Server),
            "chef" | "cuisinier" => Some(Self::Chef),
            "manager" | "gerant" => Some(Self::Manager),
            _ => None,
        }
    }

    /// Staff roles work in the restaurant; clients and guests do not
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Server | Self::Chef | Self::Manager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order lifecycle state
///
/// `pending → preparing → ready → served`, with `cancelled` reachable
/// from pending (direct) and from preparing/ready (manager-approved).
/// Terminal states reject every further transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    Pending,
    Preparing,
    Ready,
    Served,
    Cancelled,
}

impl OrderState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Served => "served",
            Self::Cancelled => "cancelled",
        }
    }

    /// Translate a status filter to the canonical state
    ///
    /// The translation table covers every spelling observed in the wild:
    /// English, the shorthand "waiting", and the accentless French forms.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace(' ', "_").as_str() {
            "pending" | "waiting" | "en_attente" => Some(Self::Pending),
            "preparing" | "en_preparation" | "lancee" | "started" => Some(Self::Preparing),
            "ready" | "pret" | "prete" => Some(Self::Ready),
            "served" | "servi" | "servie" | "en_service" => Some(Self::Served),
            "cancelled" | "canceled" | "annulee" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Served and cancelled orders accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Served | Self::Cancelled)
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Table occupancy state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableState {
    Free,
    Reserved,
    Occupied,
}

impl TableState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Reserved => "reserved",
            Self::Occupied => "occupied",
        }
    }
}

impl fmt::Display for TableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reservation lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// Per-item preparation status inside an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrepStatus {
    NotStarted,
    Preparing,
    Done,
}

/// Cancellation request status (manager-gated)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancellationStatus {
    Pending,
    Approved,
    Rejected,
}

/// Assistance request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistanceStatus {
    Open,
    InProgress,
    Resolved,
}

/// Notification priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    Normal,
    High,
}
