//! Sample data for a fresh schedule

use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;

use super::{ClassSession, NewClass, Schedule};

const GROUP_WORDS: &[&str] = &[
    "Alpha", "Aurora", "Beacon", "Cedar", "Comet", "Delta", "Ember", "Falcon", "Harbor", "Horizon",
    "Juniper", "Lumen", "Maple", "Meridian", "Nova", "Orbit", "Pioneer", "Quartz", "Summit",
    "Vector",
];

const FIRST_NAMES: &[&str] = &[
    "Anna", "Boris", "Clara", "Dmitry", "Elena", "Fedor", "Galina", "Igor", "Katya", "Leonid",
    "Maria", "Nikolai", "Olga", "Pavel", "Sofia", "Timur",
];

const LAST_NAMES: &[&str] = &[
    "Abramov", "Belova", "Chernov", "Davydova", "Egorov", "Frolova", "Gusev", "Ivanova", "Kozlov",
    "Lebedeva", "Morozov", "Novikova", "Orlov", "Petrova", "Smirnov", "Volkova",
];

fn pick<'a, R: Rng>(rng: &mut R, words: &[&'a str]) -> &'a str {
    words.choose(rng).copied().unwrap_or_default()
}

/// A random class on a date within 30 days of `today`
pub fn random_class<R: Rng>(rng: &mut R, today: NaiveDate) -> NewClass {
    let date = today + Duration::days(rng.gen_range(-30..=30));
    NewClass {
        group_name: pick(rng, GROUP_WORDS).to_string(),
        teacher_name: format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES)),
        classroom: rng.gen_range(100..=300).to_string(),
        date: date.format("%Y-%m-%d").to_string(),
        time: format!(
            "{:02}:{:02}:{:02}",
            rng.gen_range(0..24),
            rng.gen_range(0..60),
            rng.gen_range(0..60)
        ),
    }
}

/// Fill `schedule` with `count` random classes
pub fn generate_sample_data<R: Rng>(
    schedule: &mut Schedule,
    count: usize,
    rng: &mut R,
    today: NaiveDate,
) -> Vec<ClassSession> {
    let added: Vec<ClassSession> = (0..count)
        .map(|_| schedule.add(random_class(rng, today)))
        .collect();
    tracing::info!("Generated {} sample classes", added.len());
    added
}
