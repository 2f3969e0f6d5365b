//! Realistic fake values for generated records.
//!
//! [`FakeSource`] is the seam: every method draws from the caller's RNG, so
//! the source itself holds no randomness and a seeded context stays
//! reproducible.

use chrono::{DateTime, Datelike as _, Duration, NaiveDate, Utc};
use rand::{Rng, seq::SliceRandom as _};

/// Producer of random human-looking strings and dates.
pub trait FakeSource {
  fn first_name<R: Rng + ?Sized>(&self, rng: &mut R) -> String;

  fn last_name<R: Rng + ?Sized>(&self, rng: &mut R) -> String;

  fn email<R: Rng + ?Sized>(&self, rng: &mut R) -> String;

  /// A one-line postal address.
  fn address<R: Rng + ?Sized>(&self, rng: &mut R) -> String;

  fn phone_number<R: Rng + ?Sized>(&self, rng: &mut R) -> String;

  /// A single lowercase word.
  fn word<R: Rng + ?Sized>(&self, rng: &mut R) -> String;

  /// A capitalised sentence ending in a full stop.
  fn sentence<R: Rng + ?Sized>(&self, rng: &mut R) -> String;

  /// Up to `count` pairwise distinct words. Fewer come back once the
  /// vocabulary runs out.
  fn distinct_words<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<String> {
    const MAX_MISSES: usize = 100;

    let mut out: Vec<String> = Vec::with_capacity(count);
    let mut misses = 0;
    while out.len() < count && misses < MAX_MISSES {
      let word = self.word(rng);
      if out.contains(&word) {
        misses += 1;
      } else {
        out.push(word);
      }
    }
    out
  }

  /// Several sentences.
  fn paragraph<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
    let count = rng.gen_range(3..=6);
    (0..count)
      .map(|_| self.sentence(rng))
      .collect::<Vec<_>>()
      .join(" ")
  }

  /// A birth date for someone aged 18 to 90 on `today`.
  fn date_of_birth<R: Rng + ?Sized>(&self, rng: &mut R, today: NaiveDate) -> NaiveDate {
    let youngest = years_before(today, 18);
    let oldest = years_before(today, 90);
    let span = (youngest - oldest).num_days();
    oldest + Duration::days(rng.gen_range(0..=span))
  }

  /// A uniformly random instant in `[start, end]`, at second resolution.
  /// Returns `start` if the range is empty.
  fn date_time_between<R: Rng + ?Sized>(
    &self,
    rng: &mut R,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
  ) -> DateTime<Utc> {
    let span = (end - start).num_seconds();
    if span <= 0 {
      return start;
    }
    start + Duration::seconds(rng.gen_range(0..=span))
  }
}

fn years_before(day: NaiveDate, years: i32) -> NaiveDate {
  // Feb 29 falls back to Feb 28 in non-leap years.
  day
    .with_year(day.year() - years)
    .or_else(|| day.pred_opt().and_then(|d| d.with_year(d.year() - years)))
    .unwrap_or(day)
}

// ─── Word lists ──────────────────────────────────────────────────────────────

const FIRST_NAMES: &[&str] = &[
  "Adam", "Agata", "Aleksander", "Alicja", "Anna", "Antoni", "Bartosz",
  "Beata", "Dawid", "Dominika", "Ewa", "Filip", "Gabriela", "Hanna", "Igor",
  "Iwona", "Jakub", "Julia", "Kacper", "Karolina", "Katarzyna", "Lena",
  "Maciej", "Magdalena", "Marek", "Maria", "Mateusz", "Michał", "Natalia",
  "Oliwia", "Paweł", "Piotr", "Robert", "Szymon", "Tomasz", "Wiktoria",
  "Wojciech", "Zofia", "Zuzanna", "Emma", "Liam", "Noah", "Olivia", "James",
];

const LAST_NAMES: &[&str] = &[
  "Nowak", "Kowalski", "Wiśniewski", "Wójcik", "Kowalczyk", "Kamiński",
  "Lewandowski", "Zieliński", "Szymański", "Woźniak", "Dąbrowski",
  "Kozłowski", "Jankowski", "Mazur", "Kwiatkowski", "Krawczyk", "Piotrowski",
  "Grabowski", "Nowakowski", "Pawłowski", "Michalski", "Adamczyk", "Dudek",
  "Zając", "Wieczorek", "Jabłoński", "Król", "Majewski", "Olszewski",
  "Jaworski", "Smith", "Johnson", "Brown", "Taylor", "Miller", "Wilson",
];

const EMAIL_DOMAINS: &[&str] = &[
  "example.com", "example.org", "example.net", "mail.test", "inbox.test",
];

const STREETS: &[&str] = &[
  "Marszałkowska", "Długa", "Krótka", "Ogrodowa", "Polna", "Leśna",
  "Słoneczna", "Lipowa", "Kwiatowa", "Szkolna", "Mickiewicza", "Kościuszki",
  "Sienkiewicza", "Piłsudskiego", "Wojska Polskiego", "Main Street",
  "Oak Avenue", "River Road", "Park Lane", "Hill Street",
];

const TOWNS: &[&str] = &[
  "Warszawa", "Kraków", "Łódź", "Wrocław", "Poznań", "Gdańsk", "Szczecin",
  "Bydgoszcz", "Lublin", "Katowice", "Białystok", "Gdynia", "Toruń",
  "Radom", "Rzeszów", "Olsztyn", "Opole", "Kielce",
];

const WORDS: &[&str] = &[
  "adventure", "afternoon", "album", "art", "autumn", "bakery", "beach",
  "bicycle", "board", "book", "bridge", "camp", "canoe", "castle", "chess",
  "choir", "cinema", "climbing", "coffee", "concert", "cooking", "craft",
  "cycling", "dance", "dinner", "drawing", "evening", "exhibition", "festival",
  "film", "fishing", "forest", "friends", "gallery", "game", "garden",
  "guitar", "harbour", "hiking", "history", "island", "jazz", "jogging",
  "karaoke", "kayak", "lake", "language", "lecture", "library", "market",
  "meadow", "meetup", "morning", "mountain", "museum", "music", "nature",
  "night", "opera", "painting", "park", "photography", "picnic", "poetry",
  "pottery", "quiz", "reading", "river", "running", "sailing", "sculpture",
  "singing", "skating", "skiing", "sports", "stars", "street", "summer",
  "sunrise", "sunset", "swimming", "tasting", "tennis", "theatre", "tour",
  "trail", "travel", "volleyball", "walk", "weekend", "wine", "winter",
  "workshop", "yoga", "zoo",
];

const CONNECTIVES: &[&str] = &[
  "and", "with", "near", "after", "before", "under", "over", "for", "by",
  "around", "during", "beyond",
];

/// The built-in [`FakeSource`], drawing from fixed word lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordLists;

fn pick<R: Rng + ?Sized>(rng: &mut R, list: &[&'static str]) -> &'static str {
  list.choose(rng).copied().unwrap_or_default()
}

fn ascii_lower(s: &str) -> String {
  s.chars()
    .filter_map(|c| match c {
      'ą' | 'Ą' => Some('a'),
      'ć' | 'Ć' => Some('c'),
      'ę' | 'Ę' => Some('e'),
      'ł' | 'Ł' => Some('l'),
      'ń' | 'Ń' => Some('n'),
      'ó' | 'Ó' => Some('o'),
      'ś' | 'Ś' => Some('s'),
      'ź' | 'Ź' | 'ż' | 'Ż' => Some('z'),
      c if c.is_ascii_alphanumeric() => Some(c.to_ascii_lowercase()),
      _ => None,
    })
    .collect()
}

impl FakeSource for WordLists {
  fn first_name<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
    pick(rng, FIRST_NAMES).to_owned()
  }

  fn last_name<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
    pick(rng, LAST_NAMES).to_owned()
  }

  fn email<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
    let first = ascii_lower(pick(rng, FIRST_NAMES));
    let last = ascii_lower(pick(rng, LAST_NAMES));
    let number: u16 = rng.gen_range(1..=999);
    let domain = pick(rng, EMAIL_DOMAINS);
    format!("{first}.{last}{number}@{domain}")
  }

  fn address<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
    let street = pick(rng, STREETS);
    let number: u16 = rng.gen_range(1..=250);
    let postal_a: u8 = rng.gen_range(0..=99);
    let postal_b: u16 = rng.gen_range(0..=999);
    let town = pick(rng, TOWNS);
    format!("{street} {number}, {postal_a:02}-{postal_b:03} {town}")
  }

  fn phone_number<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
    let a: u16 = rng.gen_range(500..=899);
    let b: u16 = rng.gen_range(0..=999);
    let c: u16 = rng.gen_range(0..=999);
    format!("+48 {a:03} {b:03} {c:03}")
  }

  fn word<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
    pick(rng, WORDS).to_owned()
  }

  fn distinct_words<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<String> {
    WORDS
      .choose_multiple(rng, count)
      .map(|w| (*w).to_owned())
      .collect()
  }

  fn sentence<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
    let len = rng.gen_range(4..=9);
    let mut words: Vec<&str> = Vec::with_capacity(len);
    for i in 0..len {
      if i > 0 && i < len - 1 && rng.gen_bool(0.2) {
        words.push(pick(rng, CONNECTIVES));
      } else {
        words.push(pick(rng, WORDS));
      }
    }

    let mut out = words.join(" ");
    if let Some(first) = out.get_mut(0..1) {
      first.make_ascii_uppercase();
    }
    out.push('.');
    out
  }
}
