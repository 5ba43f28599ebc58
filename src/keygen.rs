//! Synthesis of u32 key sequences with controllable pre-sortedness.

use clap::ValueEnum;
use rand::Rng;

/// Largest generatable key count (2^30 keys, 4 GiB of data).
pub const MAX_KEY_NR: u64 = 1 << 30;

/// Named pre-sort schemes used to stress different algorithmic cases of a
/// sorting routine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Presort {
    /// Fully reversed: n, n-1, ..., 1.
    Fullrev,
    /// Mostly reversed with rare ascending stretches.
    Rarerev,
    /// Ascending and descending stretches evenly mixed.
    Even,
    /// Mostly ascending with rare descending stretches.
    Rarein,
    /// Fully increasing: 0, 1, ..., n-1.
    Fullin,
    /// Worst case for insertion sort: one large key ahead of a sorted run.
    Worstins,
    /// Uniformly random draws over the full u32 range.
    Random,
}

impl Presort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Presort::Fullrev => "fullrev",
            Presort::Rarerev => "rarerev",
            Presort::Even => "even",
            Presort::Rarein => "rarein",
            Presort::Fullin => "fullin",
            Presort::Worstins => "worstins",
            Presort::Random => "random",
        }
    }
}

impl std::fmt::Display for Presort {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generate exactly `key_nr` keys arranged according to `presort`.
pub fn generate(presort: Presort, key_nr: usize) -> Vec<u32> {
    match presort {
        Presort::Fullrev => (1..=key_nr as u32).rev().collect(),
        Presort::Fullin => (0..key_nr as u32).collect(),
        Presort::Rarerev => order_factor_keys(40, key_nr),
        Presort::Even => order_factor_keys(50, key_nr),
        Presort::Rarein => order_factor_keys(60, key_nr),
        Presort::Worstins => worstins_keys(key_nr),
        Presort::Random => {
            let mut rng = rand::thread_rng();
            (0..key_nr).map(|_| rng.gen::<u32>()).collect()
        }
    }
}

/// A sorted run of n-1 keys with a key larger than all of them prepended,
/// forcing insertion sort to shift the maximum across every position.
fn worstins_keys(key_nr: usize) -> Vec<u32> {
    if key_nr == 0 {
        return Vec::new();
    }

    let mut keys = Vec::with_capacity(key_nr);
    keys.push(key_nr as u32);
    keys.extend(0..key_nr as u32 - 1);
    keys
}

/// Build a sequence where `order_factor` percent of positions run upward
/// and the rest run downward, deterministically interleaved.
///
/// The first floor(factor * n / 100) slots are marked ascending and the rest
/// descending, then the marks are permuted by a Fisher-Yates pass whose
/// "random" draw is the constant factor/100. The same factor always yields
/// the same interleaving, so a given scheme is reproducible run to run.
/// Ascending marks take values counting up from 2^30, descending marks
/// counting down from 2^30 - 1, keeping the two streams disjoint.
fn order_factor_keys(order_factor: u32, key_nr: usize) -> Vec<u32> {
    let ascending_nr = (order_factor as u64 * key_nr as u64 / 100) as usize;

    let mut ascending: Vec<bool> = (0..key_nr).map(|i| i < ascending_nr).collect();
    shuffle_with_constant(&mut ascending, order_factor as f64 / 100.0);

    let mut cur_min: u32 = (1 << 30) - 1;
    let mut cur_max: u32 = 1 << 30;

    ascending
        .into_iter()
        .map(|up| {
            if up {
                let key = cur_max;
                cur_max += 1;
                key
            } else {
                let key = cur_min;
                cur_min -= 1;
                key
            }
        })
        .collect()
}

// Fisher-Yates with a fixed draw instead of a random one.
fn shuffle_with_constant(marks: &mut [bool], draw: f64) {
    for i in (1..marks.len()).rev() {
        let j = (draw * (i + 1) as f64) as usize;
        marks.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fullrev_and_fullin_exact_sequences() {
        assert_eq!(generate(Presort::Fullrev, 5), vec![5, 4, 3, 2, 1]);
        assert_eq!(generate(Presort::Fullin, 5), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn every_scheme_returns_exactly_n_keys() {
        for presort in [
            Presort::Fullrev,
            Presort::Rarerev,
            Presort::Even,
            Presort::Rarein,
            Presort::Fullin,
            Presort::Worstins,
            Presort::Random,
        ] {
            for n in [0usize, 1, 2, 7, 100] {
                assert_eq!(
                    generate(presort, n).len(),
                    n,
                    "scheme {presort} with {n} keys"
                );
            }
        }
    }

    #[test]
    fn worstins_leads_with_the_maximum() {
        let keys = generate(Presort::Worstins, 6);
        assert_eq!(keys, vec![6, 0, 1, 2, 3, 4]);
        assert!(keys[1..].iter().all(|&k| k < keys[0]));
    }

    #[test]
    fn order_factor_schemes_are_deterministic() {
        assert_eq!(generate(Presort::Even, 64), generate(Presort::Even, 64));
        assert_eq!(
            generate(Presort::Rarerev, 64),
            generate(Presort::Rarerev, 64)
        );
    }

    #[test]
    fn order_factor_streams_stay_disjoint() {
        let keys = generate(Presort::Even, 1000);
        let ups = keys.iter().filter(|&&k| k >= 1 << 30).count();
        let downs = keys.iter().filter(|&&k| k < 1 << 30).count();
        assert_eq!(ups + downs, 1000);
        assert_eq!(ups, 500);
    }

    #[test]
    fn rarein_is_mostly_ascending() {
        let keys = generate(Presort::Rarein, 1000);
        let ascending_steps = keys.windows(2).filter(|w| w[1] > w[0]).count();
        assert!(ascending_steps > 500, "got {ascending_steps} rising steps");
    }
}
