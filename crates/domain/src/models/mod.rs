//! Domain models for the cricket club.

/// Declares a closed set of values with their wire spelling.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize,
        )]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| {
                        let allowed: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                        format!("must be one of {}", allowed.join(", "))
                    })
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod fixture;
pub mod player;
pub mod registration;
pub mod temp_user;
pub mod tournament;

pub use fixture::{Match, MatchResult, MatchScores};
pub use player::{
    rank_players, BattingStyle, BowlingStyle, Experience, Gender, NewPlayer, Performance, Player,
    PlayerProfile, PreferredRole,
};
pub use registration::{
    CodeRequest, CodeSubmission, InputError, NewRegistration, RegistrationForm, OTP_LENGTH,
};
pub use temp_user::{TempUser, TempUserState};
pub use tournament::{schedule_tournaments, Tournament, TournamentFormat, TournamentStatus};
