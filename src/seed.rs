//! Generates random but reproducible transactions for manual testing.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};
use time::{OffsetDateTime, macros::datetime};

use crate::{
    Error,
    transaction::{NewTransaction, TransactionType, count_transactions, create_transaction},
};

/// The number of transactions to generate when not specified.
pub const DEFAULT_SEED_COUNT: usize = 100;

/// The random seed to use when not specified.
pub const DEFAULT_SEED: u64 = 42;

const CATEGORIES: [&str; 7] = [
    "groceries",
    "utilities",
    "entertainment",
    "transportation",
    "healthcare",
    "education",
    "dining",
];

const LOREM_IPSUM: [&str; 24] = [
    "lorem",
    "ipsum",
    "dolor",
    "sit",
    "amet",
    "consectetur",
    "adipiscing",
    "elit",
    "sed",
    "do",
    "eiusmod",
    "tempor",
    "incididunt",
    "ut",
    "labore",
    "et",
    "dolore",
    "magna",
    "aliqua",
    "enim",
    "ad",
    "minim",
    "veniam",
    "quis",
];

/// Generate `count` transactions from `seed`, dated between 2020-01-01 and `now`.
///
/// The same seed and `now` always give the same transactions.
///
/// # Errors
/// Returns [Error::InvalidDate] if a generated timestamp is out of range.
pub fn generate_transactions(
    count: usize,
    seed: u64,
    now: OffsetDateTime,
) -> Result<Vec<NewTransaction>, Error> {
    let mut rng = StdRng::seed_from_u64(seed);
    let earliest = datetime!(2020-01-01 0:00 UTC).unix_timestamp();
    let latest = now.unix_timestamp().max(earliest);

    (0..count)
        .map(|_| {
            let type_ = if rng.gen_bool(0.5) {
                TransactionType::Inflow
            } else {
                TransactionType::Outflow
            };
            let timestamp = rng.gen_range(earliest..=latest);
            let date = OffsetDateTime::from_unix_timestamp(timestamp)
                .map_err(|error| Error::InvalidDate(error.to_string()))?;

            Ok(NewTransaction {
                type_,
                amount: rng.gen_range(500..=50_000),
                date,
                category: CATEGORIES.choose(&mut rng).map(|category| category.to_string()),
                description: Some(lorem_ipsum(&mut rng)),
            })
        })
        .collect()
}

fn lorem_ipsum(rng: &mut StdRng) -> String {
    let word_count = rng.gen_range(3..=8);
    let words: Vec<&str> = (0..word_count)
        .filter_map(|_| LOREM_IPSUM.choose(rng).copied())
        .collect();
    let sentence = words.join(" ");

    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => sentence,
    }
}

/// Insert `count` generated transactions into the database in one SQL transaction.
///
/// # Errors
/// Returns an error if a transaction could not be generated or inserted. No
/// rows are kept in that case.
pub fn seed_transactions(
    count: usize,
    seed: u64,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<usize, Error> {
    let transactions = generate_transactions(count, seed, now)?;
    let sql_transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    for transaction in &transactions {
        create_transaction(transaction, &sql_transaction)?;
    }

    let total = count_transactions(&sql_transaction)?;
    sql_transaction.commit()?;
    tracing::info!(
        "Seeded {} transactions using seed {seed}, the database now holds {total}",
        transactions.len()
    );

    Ok(transactions.len())
}
