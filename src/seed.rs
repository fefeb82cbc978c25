//! Synthetic employee rows.
//!
//! Names and roles are drawn uniformly and independently with replacement, so
//! duplicate rows are expected. The random source is supplied by the caller;
//! `main` seeds it from the clock, tests seed it with a constant.

use log::{debug, info};
use rand::Rng;

use crate::db::DBBehavior;
use crate::error::{ProvisionError, Result};

pub const SEED_COUNT: usize = 50;
pub const EMAIL_DOMAIN: &str = "techtech.com";

pub const FIRST_NAMES: [&str; 5] = ["John", "Jane", "Alice", "Bob", "Charlie"];
pub const LAST_NAMES: [&str; 5] = ["Doe", "Smith", "Johnson", "Williams", "Brown"];
pub const ROLES: [&str; 5] = [
    "Janitor",
    "SoftwareDev",
    "AiEthics",
    "ItConsultant",
    "CleaningLady",
];

/// One row of the employees table, minus the storage-assigned `emp_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub news: bool,
    pub role: String,
}

impl Employee {
    pub fn new(firstname: &str, lastname: &str, role: &str) -> Self {
        Self {
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
            email: email_for(firstname, lastname),
            news: false,
            role: role.to_string(),
        }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let firstname = pick(rng, &FIRST_NAMES);
        let lastname = pick(rng, &LAST_NAMES);
        let role = pick(rng, &ROLES);
        Employee::new(firstname, lastname, role)
    }
}

pub fn email_for(firstname: &str, lastname: &str) -> String {
    format!("{}{}@{}", firstname, lastname, EMAIL_DOMAIN)
}

fn pick<'a, R: Rng>(rng: &mut R, choices: &[&'a str]) -> &'a str {
    choices[rng.gen_range(0..choices.len())]
}

/// Insert `count` random employees into `table`, one statement per row.
///
/// Stops at the first failing insert; rows written before it stay in place.
pub fn seed_employees<D, R>(db: &mut D, table: &str, rng: &mut R, count: usize) -> Result<usize>
where
    D: DBBehavior + ?Sized,
    R: Rng,
{
    for row in 0..count {
        let employee = Employee::random(rng);
        debug!("inserting {:?}", employee);
        db.insert_employee(table, &employee)
            .map_err(|source| ProvisionError::Insert {
                table: table.to_string(),
                row,
                source,
            })?;
    }
    info!("inserted {} rows into {}", count, table);
    Ok(count)
}
