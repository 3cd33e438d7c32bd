use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:tt),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(SoundtrackMood {
    Neutral => "neutral",
    Mystery => "mystery",
    Tension => "tension",
    Melancholy => "melancholy",
    Epiphany => "epiphany",
});

// Role label on the wire to the completion provider.
str_enum!(MessageRole {
    System => "system",
    User => "user",
    Assistant => "assistant",
});

/// Author of a prior conversation turn.
///
/// Callers may label AI turns `model` (the canvas frontend does);
/// every assistant label collapses to the canonical `Assistant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TurnRole {
    User,
    Assistant,
}

/// Labels accepted for assistant-authored turns.
const ASSISTANT_LABELS: &[&str] = &["assistant", "model"];

impl TurnRole {
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("user") {
            return Some(Self::User);
        }
        ASSISTANT_LABELS
            .iter()
            .any(|known| label.eq_ignore_ascii_case(known))
            .then_some(Self::Assistant)
    }

    /// Role this turn is sent with upstream.
    pub fn message_role(&self) -> MessageRole {
        match self {
            Self::User => MessageRole::User,
            Self::Assistant => MessageRole::Assistant,
        }
    }
}

impl TryFrom<String> for TurnRole {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_label(&value).ok_or(ModelError::InvalidEnum {
            field: "TurnRole".into(),
            value,
        })
    }
}

impl From<TurnRole> for String {
    fn from(role: TurnRole) -> Self {
        role.message_role().as_str().to_string()
    }
}
