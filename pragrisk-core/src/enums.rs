//! Enumerations carried by catalogue entities.
//!
//! Every enum travels over the wire as its short code (`KOM`, `PREV`, ...)
//! and is shown to users by its label.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error when parsing an enumeration code that is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {kind} code: {value}")]
pub struct EnumParseError {
    pub kind: &'static str,
    pub value: String,
}

/// Generates the code/label plumbing shared by every catalogue enum.
macro_rules! catalogue_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => ($code:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl $name {
            /// Wire representation.
            pub fn as_code(&self) -> &'static str {
                match self {
                    $( $name::$variant => $code, )+
                }
            }

            /// Human readable label.
            pub fn label(&self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }

            /// Parse from the wire code, ignoring case.
            pub fn from_code(s: &str) -> Result<Self, EnumParseError> {
                let upper = s.trim().to_ascii_uppercase();
                $(
                    if upper == $code {
                        return Ok($name::$variant);
                    }
                )+
                Err(EnumParseError {
                    kind: $kind,
                    value: s.to_string(),
                })
            }

            pub fn all() -> &'static [$name] {
                &[ $( $name::$variant, )+ ]
            }

            /// All wire codes, in declaration order.
            pub fn codes() -> &'static [&'static str] {
                &[ $( $code, )+ ]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.label())
            }
        }

        impl FromStr for $name {
            type Err = EnumParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_code(s)
            }
        }
    };
}

catalogue_enum! {
    /// Organisational environment an actor belongs to.
    EnvironmentKind, "environment" {
        Kommune => ("KOM", "Kommune"),
        Ks => ("KS", "KS"),
        Uvedkommende => ("UV", "Uvedkommende"),
        Leverandor => ("LEV", "Leverandør"),
    }
}

catalogue_enum! {
    /// Kind of control a mitigation provides.
    MitigationType, "mitigation type" {
        Preventive => ("PREV", "Preventive"),
        Detective => ("DETECT", "Detective"),
        Corrective => ("CORR", "Corrective"),
        Deterrent => ("DETER", "Deterrent"),
    }
}

catalogue_enum! {
    /// Maturity of a mitigation, from not performed to continuously improved.
    MitigationStatus, "mitigation status" {
        NotPerformed => ("MISS", "Not performed"),
        AdHoc => ("ADHOC", "Performed informally"),
        Repeatable => ("REPT", "Planned & tracked"),
        Defined => ("DEF", "Well defined"),
        Measured => ("MEAS", "Quantitatively controlled"),
        Continuous => ("CONT", "Continuously improved"),
    }
}

catalogue_enum! {
    /// Role a technology plays in the landscape.
    TechCategory, "technology category" {
        Fagsystem => ("FAG", "Fagsystem"),
        Fellestjeneste => ("FEL", "Fellestjeneste"),
        Komponent => ("KOM", "Komponent"),
    }
}

catalogue_enum! {
    TechStack, "technology stack" {
        Java => ("JAVA", "Java"),
        DotNet => ("NET", ".NET"),
        Php => ("PHP", "PHP"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for status in MitigationStatus::all() {
            let parsed = MitigationStatus::from_code(status.as_code()).unwrap();
            assert_eq!(*status, parsed);
        }
        for kind in EnvironmentKind::all() {
            assert_eq!(kind.as_code().parse::<EnvironmentKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn test_from_code_is_case_insensitive() {
        assert_eq!(TechStack::from_code("net").unwrap(), TechStack::DotNet);
        assert_eq!(MitigationType::from_code(" detect ").unwrap(), MitigationType::Detective);
    }

    #[test]
    fn test_unknown_code_rejected() {
        let err = TechCategory::from_code("NOPE").unwrap_err();
        assert_eq!(err.kind, "technology category");
        assert_eq!(err.value, "NOPE");
    }

    #[test]
    fn test_serializes_as_code() {
        let json = serde_json::to_string(&EnvironmentKind::Leverandor).unwrap();
        assert_eq!(json, "\"LEV\"");
        let parsed: MitigationStatus = serde_json::from_str("\"REPT\"").unwrap();
        assert_eq!(parsed, MitigationStatus::Repeatable);
        assert_eq!(parsed.to_string(), "Planned & tracked");
    }

    #[test]
    fn test_codes_follow_declaration_order() {
        assert_eq!(TechStack::codes(), &["JAVA", "NET", "PHP"]);
    }
}
