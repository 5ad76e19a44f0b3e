use std::borrow::Cow;

use chrono::{Duration as ChronoDuration, NaiveDate, NaiveTime};
use fake::faker::address::en::*;
use fake::faker::company::en::*;
use fake::faker::internet::en::*;
use fake::faker::lorem::en::*;
use fake::faker::name::en::*;
use fake::faker::phone_number::en::*;
use fake::Fake;
use rand::{Rng, RngCore};

use crate::generate::replacements::Replacements;
use crate::generate::value::Value;

/// Wrap a dynamically generated String into a Value::String.
#[inline]
fn owned(s: String) -> Value {
    Value::String(Cow::Owned(s))
}

/// Pick one entry of a static table (zero heap allocation).
#[inline]
fn pick(rng: &mut dyn RngCore, items: &'static [&'static str]) -> Value {
    Value::String(Cow::Borrowed(items[rng.random_range(0..items.len())]))
}

const DEPARTMENTS: &[&str] = &[
    "Engineering",
    "Sales",
    "Marketing",
    "Product",
    "Design",
    "HR",
    "Finance",
    "Legal",
    "Operations",
    "Support",
];

const CURRENCIES: &[&str] = &[
    "USD", "EUR", "GBP", "JPY", "CAD", "AUD", "CHF", "CNY", "INR", "BRL",
];

const MONTHS: &[&str] = &[
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAYS: &[&str] = &[
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const COLORS: &[&str] = &[
    "red", "orange", "yellow", "green", "blue", "indigo", "violet", "black", "white", "gray",
];

/// Earliest date handed out by the temporal producers.
fn date_floor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default()
}

/// Number of days the temporal producers spread over (2000-01-01 ..= 2029-12-31).
const DATE_SPAN_DAYS: i64 = 10_958;

fn random_date(rng: &mut dyn RngCore) -> NaiveDate {
    date_floor() + ChronoDuration::days(rng.random_range(0..DATE_SPAN_DAYS))
}

fn random_time(rng: &mut dyn RngCore) -> NaiveTime {
    NaiveTime::from_num_seconds_from_midnight_opt(rng.random_range(0..86_400), 0)
        .unwrap_or_default()
}

/// Register the built-in `${...}` producers.
pub fn register_defaults(r: &mut Replacements) {
    // === Identity ===
    r.insert("${first_name}", |rng| owned(FirstName().fake_with_rng(rng)));
    r.insert("${last_name}", |rng| owned(LastName().fake_with_rng(rng)));
    r.insert("${name}", |rng| owned(Name().fake_with_rng(rng)));
    r.insert("${username}", |rng| owned(Username().fake_with_rng(rng)));

    // === Contact ===
    r.insert("${email}", |rng| owned(SafeEmail().fake_with_rng(rng)));
    r.insert("${phone}", |rng| owned(PhoneNumber().fake_with_rng(rng)));

    // === Address ===
    r.insert("${street}", |rng| owned(StreetName().fake_with_rng(rng)));
    r.insert("${city}", |rng| owned(CityName().fake_with_rng(rng)));
    r.insert("${state}", |rng| owned(StateName().fake_with_rng(rng)));
    r.insert("${zip}", |rng| owned(ZipCode().fake_with_rng(rng)));
    r.insert("${country}", |rng| owned(CountryName().fake_with_rng(rng)));
    r.insert("${country_code}", |rng| {
        owned(CountryCode().fake_with_rng(rng))
    });
    r.insert("${latitude}", |rng| Value::Float(Latitude().fake_with_rng(rng)));
    r.insert("${longitude}", |rng| {
        Value::Float(Longitude().fake_with_rng(rng))
    });

    // === Company ===
    r.insert("${company}", |rng| owned(CompanyName().fake_with_rng(rng)));
    r.insert("${job_title}", |rng| owned(Profession().fake_with_rng(rng)));
    r.insert("${industry}", |rng| owned(Industry().fake_with_rng(rng)));
    r.insert("${department}", |rng| pick(rng, DEPARTMENTS));

    // === Internet ===
    r.insert("${domain_suffix}", |rng| {
        owned(DomainSuffix().fake_with_rng(rng))
    });
    r.insert("${email_provider}", |rng| {
        owned(FreeEmailProvider().fake_with_rng(rng))
    });
    r.insert("${ipv4}", |rng| owned(IPv4().fake_with_rng(rng)));
    r.insert("${mac_address}", |rng| owned(MACAddress().fake_with_rng(rng)));
    r.insert("${user_agent}", |rng| owned(UserAgent().fake_with_rng(rng)));
    r.insert("${url}", |rng| {
        let words: Vec<String> = Words(1..3).fake_with_rng(rng);
        let suffix: String = DomainSuffix().fake_with_rng(rng);
        owned(format!("https://{}.{}", words.join("-"), suffix))
    });

    // === Content ===
    r.insert("${word}", |rng| {
        let words: Vec<String> = Words(1..2).fake_with_rng(rng);
        owned(words.join(" "))
    });
    r.insert("${sentence}", |rng| owned(Sentence(5..12).fake_with_rng(rng)));
    r.insert("${paragraph}", |rng| {
        let paragraphs: Vec<String> = Paragraphs(1..2).fake_with_rng(rng);
        owned(paragraphs.join("\n\n"))
    });
    r.insert("${color}", |rng| pick(rng, COLORS));

    // === Numeric ===
    r.insert("${int}", |rng| Value::Int(rng.random_range(0..10_000)));
    r.insert("${int64}", |rng| Value::Int(rng.random::<i64>()));
    r.insert("${digit}", |rng| Value::Int(rng.random_range(0..10)));
    r.insert("${percent}", |rng| Value::Int(rng.random_range(0..=100)));
    r.insert("${float}", |rng| Value::Float(rng.random_range(0.0..1000.0)));
    r.insert("${bool}", |rng| Value::Bool(rng.random_bool(0.5)));

    // === Financial ===
    r.insert("${price}", |rng| {
        let val: f64 = rng.random_range(0.01..=999.99);
        Value::Float((val * 100.0_f64).round() / 100.0_f64)
    });
    r.insert("${currency}", |rng| pick(rng, CURRENCIES));

    // === Temporal ===
    r.insert("${date}", |rng| Value::Date(random_date(rng)));
    r.insert("${time}", |rng| Value::Time(random_time(rng)));
    r.insert("${timestamp}", |rng| {
        let date = random_date(rng);
        Value::Timestamp(date.and_time(random_time(rng)))
    });
    r.insert("${year}", |rng| Value::Int(rng.random_range(1970..=2030)));
    r.insert("${month}", |rng| pick(rng, MONTHS));
    r.insert("${weekday}", |rng| pick(rng, WEEKDAYS));

    // === Identifiers ===
    r.insert("${uuid}", |rng| {
        let mut bytes = [0u8; 16];
        rng.fill_bytes(&mut bytes);
        Value::Uuid(uuid::Builder::from_random_bytes(bytes).into_uuid())
    });
}
