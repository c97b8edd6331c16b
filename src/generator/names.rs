use crate::domain::Gender;

pub const MALE_FIRST_NAMES: [&str; 20] = [
    "John",
    "Michael",
    "William",
    "James",
    "Alexander",
    "David",
    "Daniel",
    "Joseph",
    "Henry",
    "Lucas",
    "Thomas",
    "Robert",
    "Richard",
    "Charles",
    "Christopher",
    "Andrew",
    "Paul",
    "Steven",
    "Kevin",
    "Brian",
];

pub const FEMALE_FIRST_NAMES: [&str; 20] = [
    "Emma",
    "Sophia",
    "Isabella",
    "Olivia",
    "Ava",
    "Mia",
    "Charlotte",
    "Amelia",
    "Emily",
    "Elizabeth",
    "Sofia",
    "Evelyn",
    "Victoria",
    "Grace",
    "Zoe",
    "Lily",
    "Hannah",
    "Natalie",
    "Alice",
    "Laura",
];

/// Shared by both genders.
pub const LAST_NAMES: [&str; 20] = [
    "Smith",
    "Johnson",
    "Brown",
    "Taylor",
    "Anderson",
    "Wilson",
    "Martinez",
    "Garcia",
    "Davis",
    "Rodriguez",
    "Miller",
    "Lee",
    "Wang",
    "Thompson",
    "White",
    "Harris",
    "Martin",
    "Moore",
    "Jackson",
    "Clark",
];

pub const EMAIL_DOMAINS: [&str; 8] = [
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "proton.me",
    "icloud.com",
    "aol.com",
    "fastmail.com",
];

pub fn first_names(gender: Gender) -> &'static [&'static str] {
    match gender {
        Gender::Male => &MALE_FIRST_NAMES,
        Gender::Female => &FEMALE_FIRST_NAMES,
    }
}
