//! Locale settings for displaying numbers and dates, and for ordering text.

use std::{cmp::Ordering, fmt::Display, str::FromStr};

use icu_collator::{Collator, CollatorBorrowed, options::CollatorOptions};
use icu_locale_core::{Locale as IcuLocale, locale};
use serde::{Deserialize, Serialize};
use time::Month;

/// The locales the UI can be displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    /// Hungarian, e.g. `12 345,67` and `2024. jan. 15.`
    #[default]
    #[serde(rename = "hu-HU")]
    Hungarian,
    /// US English, e.g. `12,345.67` and `Jan 15, 2024`
    #[serde(rename = "en-US")]
    EnglishUs,
}

impl Locale {
    /// The character placed between the whole and fractional parts of a number.
    pub fn decimal_separator(self) -> char {
        match self {
            Locale::Hungarian => ',',
            Locale::EnglishUs => '.',
        }
    }

    /// The abbreviated name of `month`.
    pub fn month_abbreviation(self, month: Month) -> &'static str {
        match self {
            Locale::Hungarian => match month {
                Month::January => "jan.",
                Month::February => "febr.",
                Month::March => "márc.",
                Month::April => "ápr.",
                Month::May => "máj.",
                Month::June => "jún.",
                Month::July => "júl.",
                Month::August => "aug.",
                Month::September => "szept.",
                Month::October => "okt.",
                Month::November => "nov.",
                Month::December => "dec.",
            },
            Locale::EnglishUs => match month {
                Month::January => "Jan",
                Month::February => "Feb",
                Month::March => "Mar",
                Month::April => "Apr",
                Month::May => "May",
                Month::June => "Jun",
                Month::July => "Jul",
                Month::August => "Aug",
                Month::September => "Sep",
                Month::October => "Oct",
                Month::November => "Nov",
                Month::December => "Dec",
            },
        }
    }

    /// The BCP 47 language tag, e.g. for the `lang` attribute of a page.
    pub fn as_tag(self) -> &'static str {
        match self {
            Locale::Hungarian => "hu-HU",
            Locale::EnglishUs => "en-US",
        }
    }

    /// The ICU locale for [Locale::as_tag], used to load collation and number data.
    pub fn icu_locale(self) -> IcuLocale {
        match self {
            Locale::Hungarian => locale!("hu-HU"),
            Locale::EnglishUs => locale!("en-US"),
        }
    }

    /// A collator that orders text the way readers of this locale expect.
    pub fn collator(self) -> TextCollator {
        let collator = Collator::try_new(self.icu_locale().into(), CollatorOptions::default())
            .inspect_err(|error| {
                tracing::warn!("no collation data for {self}, falling back to case folding: {error}")
            })
            .ok();

        TextCollator { collator }
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// The error returned when parsing an unsupported locale tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale \"{0}\", expected one of hu-HU, en-US")]
pub struct UnsupportedLocale(String);

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.to_ascii_lowercase().replace('_', "-").as_str() {
            "hu-hu" | "hu" => Ok(Locale::Hungarian),
            "en-us" | "en" => Ok(Locale::EnglishUs),
            _ => Err(UnsupportedLocale(tag.to_owned())),
        }
    }
}

/// Orders text for one [Locale].
///
/// Accented letters sort next to their base letter, so in Hungarian
/// `"étterem"` comes before `"zöldség"`.
pub struct TextCollator {
    collator: Option<CollatorBorrowed<'static>>,
}

impl TextCollator {
    /// Compare `a` and `b` in the collator's locale.
    ///
    /// Strings the locale treats as equal are ordered by code point, so the
    /// ordering stays total.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let collated = match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => compare_case_folded(a, b),
        };

        collated.then_with(|| a.cmp(b))
    }
}

fn compare_case_folded(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
}
