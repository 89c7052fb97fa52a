//! Closed categorical values backed by SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed row id in the
//! corresponding lookup table (`user_statuses`, `email_types`, `phone_types`).
//! Names and display labels come from a static table on the enum itself.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lookup ID type matching SMALLINT/SMALLSERIAL in the database.
pub type LookupId = i16;

/// Returned when a string or id does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! define_lookup_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr => ($str:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Every variant in seed order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// Return the database lookup ID.
            pub fn id(self) -> LookupId {
                self as LookupId
            }

            /// Machine name stored in the lookup table's `name` column.
            pub fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => $str ),+
                }
            }

            /// Human-readable label.
            pub fn label(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }

            /// Resolve a database lookup ID.
            pub fn from_id(id: LookupId) -> Option<Self> {
                match id {
                    $( x if x == $val => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$name> for LookupId {
            fn from(value: $name) -> Self {
                value as LookupId
            }
        }

        impl TryFrom<LookupId> for $name {
            type Error = UnknownVariant;

            fn try_from(id: LookupId) -> Result<Self, Self::Error> {
                $name::from_id(id).ok_or_else(|| UnknownVariant {
                    kind: $kind,
                    value: id.to_string(),
                })
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $str => Ok($name::$variant), )+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.name())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

define_lookup_enum! {
    /// Account status. Deactivation flips this; users are never deleted.
    UserStatus ("user status") {
        Active = 1 => ("active", "Active"),
        Inactive = 2 => ("inactive", "Inactive"),
        Suspended = 3 => ("suspended", "Suspended"),
    }
}

define_lookup_enum! {
    /// Category of a user email address.
    EmailType ("email type") {
        Primary = 1 => ("primary", "Primary"),
        Work = 2 => ("work", "Work"),
        Personal = 3 => ("personal", "Personal"),
        Recovery = 4 => ("recovery", "Recovery"),
    }
}

define_lookup_enum! {
    /// Category of a user phone number.
    PhoneType ("phone type") {
        Extension = 1 => ("extension", "Extension"),
        Home = 2 => ("home", "Home"),
        Personal = 3 => ("personal", "Personal"),
        Work = 4 => ("work", "Work"),
    }
}

impl UserStatus {
    /// Only active accounts may authenticate or act.
    pub fn is_active(self) -> bool {
        self == UserStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_status_ids_match_seed_data() {
        assert_eq!(UserStatus::Active.id(), 1);
        assert_eq!(UserStatus::Inactive.id(), 2);
        assert_eq!(UserStatus::Suspended.id(), 3);
    }

    #[test]
    fn email_type_labels() {
        let labels: Vec<_> = EmailType::ALL.iter().map(|t| t.label()).collect();
        assert_eq!(labels, ["Primary", "Work", "Personal", "Recovery"]);
    }

    #[test]
    fn phone_type_round_trips_through_name() {
        for kind in PhoneType::ALL {
            assert_eq!(kind.name().parse::<PhoneType>().unwrap(), *kind);
        }
        assert_eq!(PhoneType::Extension.label(), "Extension");
    }

    #[test]
    fn unknown_id_is_rejected() {
        assert_eq!(EmailType::from_id(9), None);
        let err = UserStatus::try_from(0).unwrap_err();
        assert_eq!(err.to_string(), "unknown user status '0'");
    }

    #[test]
    fn serde_uses_lowercase_name() {
        let json = serde_json::to_string(&EmailType::Recovery).unwrap();
        assert_eq!(json, "\"recovery\"");
        let parsed: PhoneType = serde_json::from_str("\"home\"").unwrap();
        assert_eq!(parsed, PhoneType::Home);
        assert!(serde_json::from_str::<PhoneType>("\"fax\"").is_err());
    }

    #[test]
    fn only_active_status_is_active() {
        assert!(UserStatus::Active.is_active());
        assert!(!UserStatus::Inactive.is_active());
        assert!(!UserStatus::Suspended.is_active());
    }
}
