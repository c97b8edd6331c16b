//! Synthetic users for throwaway test accounts.
//!
//! Every function takes the random source explicitly so a run can be replayed
//! from a seed.

pub mod names;

use rand::Rng;

use crate::domain::{Gender, NewUser, UserStatus};
use names::{first_names, EMAIL_DOMAINS, LAST_NAMES};

const TOKEN_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const TOKEN_LEN: usize = 3;

/// Fields of the generated user that the caller wants fixed.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserOptions {
    pub gender: Option<Gender>,
    pub status: Option<UserStatus>,
}

impl UserOptions {
    pub fn with_status(status: UserStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

fn pick<R: Rng>(rng: &mut R, items: &[&'static str]) -> &'static str {
    items[rng.random_range(0..items.len())]
}

/// Returns `"<First> <Last>"` drawn from the name lists for `gender`.
pub fn random_name<R: Rng>(rng: &mut R, gender: Gender) -> String {
    let first = pick(rng, first_names(gender));
    let last = pick(rng, &LAST_NAMES);
    format!("{first} {last}")
}

/// Derives a plausible address from `name`.
///
/// The local part is the lowercased name with whitespace runs collapsed to a
/// single dot and everything outside `[a-z0-9.]` dropped, followed by a
/// three character base-36 token. Tokens are not unique across calls.
pub fn random_email<R: Rng>(rng: &mut R, name: &str) -> String {
    let local = email_local_part(name);
    let token: String = (0..TOKEN_LEN)
        .map(|_| TOKEN_ALPHABET[rng.random_range(0..TOKEN_ALPHABET.len())] as char)
        .collect();
    let domain = pick(rng, &EMAIL_DOMAINS);
    format!("{local}.{token}@{domain}")
}

fn email_local_part(name: &str) -> String {
    let mut local = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for c in name.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                local.push('.');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' {
            local.push(c);
        }
    }
    local
}

/// Builds a complete user. Gender is random unless pinned; status defaults to
/// active rather than being randomized.
pub fn random_user<R: Rng>(rng: &mut R, options: UserOptions) -> NewUser {
    let gender = options
        .gender
        .unwrap_or_else(|| Gender::ALL[rng.random_range(0..Gender::ALL.len())]);
    let status = options.status.unwrap_or_default();
    let name = random_name(rng, gender);
    let email = random_email(rng, &name);
    NewUser::new(name, gender, email, status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use regex::Regex;

    fn email_pattern() -> Regex {
        let domains = EMAIL_DOMAINS
            .iter()
            .map(|d| regex::escape(d))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"^[a-z0-9.]+\.[0-9a-z]{{3}}@({domains})$")).unwrap()
    }

    #[test]
    fn test_name_draws_from_gender_lists() {
        let mut rng = StdRng::seed_from_u64(7);
        for gender in Gender::ALL {
            for _ in 0..200 {
                let name = random_name(&mut rng, gender);
                let parts: Vec<&str> = name.split(' ').collect();
                assert_eq!(parts.len(), 2, "unexpected name {name:?}");
                assert!(first_names(gender).contains(&parts[0]), "{name:?}");
                assert!(LAST_NAMES.contains(&parts[1]), "{name:?}");
            }
        }
    }

    #[test]
    fn test_email_shape() {
        let mut rng = StdRng::seed_from_u64(11);
        let pattern = email_pattern();
        let names = [
            "Jane Doe",
            "Christopher   Rodriguez",
            "O'Brien Smith-Jones",
            "ZOE WANG",
            "Élodie\tMartin 3rd",
        ];
        for name in names {
            for _ in 0..50 {
                let email = random_email(&mut rng, name);
                assert!(pattern.is_match(&email), "bad email {email:?} for {name:?}");
                assert!(!email.chars().any(|c| c.is_uppercase() || c.is_whitespace()));
            }
        }
    }

    #[test]
    fn test_email_local_part_normalization() {
        assert_eq!(email_local_part("Jane Doe"), "jane.doe");
        assert_eq!(email_local_part("Mary  Ann\tLee"), "mary.ann.lee");
        assert_eq!(email_local_part("O'Brien-Smith"), "obriensmith");
        assert_eq!(email_local_part(" Zoe "), ".zoe.");
    }

    #[test]
    fn test_email_starts_with_derived_name() {
        let mut rng = StdRng::seed_from_u64(3);
        let email = random_email(&mut rng, "Emma Clark");
        assert!(email.starts_with("emma.clark."), "{email:?}");
    }

    #[test]
    fn test_status_pinning_and_default() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let inactive = random_user(&mut rng, UserOptions::with_status(UserStatus::Inactive));
            assert_eq!(inactive.status, UserStatus::Inactive);
            let plain = random_user(&mut rng, UserOptions::default());
            assert_eq!(plain.status, UserStatus::Active);
        }
    }

    #[test]
    fn test_gender_pinning_and_spread() {
        let mut rng = StdRng::seed_from_u64(5);
        let pinned = UserOptions {
            gender: Some(Gender::Female),
            status: None,
        };
        for _ in 0..50 {
            let user = random_user(&mut rng, pinned);
            assert_eq!(user.gender, Gender::Female);
            let first = user.name.split(' ').next().unwrap();
            assert!(names::FEMALE_FIRST_NAMES.contains(&first));
        }

        let males = (0..400)
            .filter(|_| random_user(&mut rng, UserOptions::default()).gender == Gender::Male)
            .count();
        assert!((100..300).contains(&males), "skewed gender draw: {males}/400");
    }

    #[test]
    fn test_generated_users_fit_creation_schema() {
        let mut rng = StdRng::seed_from_u64(99);
        let pattern = email_pattern();
        for _ in 0..200 {
            let user = random_user(&mut rng, UserOptions::default());
            let value = serde_json::to_value(&user).unwrap();
            let object = value.as_object().unwrap();
            assert_eq!(object.len(), 4);
            assert!(object["name"].as_str().is_some_and(|s| !s.is_empty()));
            assert!(matches!(object["gender"].as_str(), Some("male" | "female")));
            assert!(matches!(object["status"].as_str(), Some("active" | "inactive")));
            assert!(pattern.is_match(object["email"].as_str().unwrap()));
        }
    }

    #[test]
    fn test_same_seed_same_user() {
        let a = random_user(&mut StdRng::seed_from_u64(1234), UserOptions::default());
        let b = random_user(&mut StdRng::seed_from_u64(1234), UserOptions::default());
        assert_eq!(a, b);
    }
}
