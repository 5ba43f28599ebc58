//! Chart rendering for benchmark results and generated datasets.

use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::results::ResultSet;
use crate::stats;

/// Path of the per-algorithm performance chart.
pub fn algo_plot_path(dir: &Path, algo: &str) -> PathBuf {
    dir.join(format!("type-int_algo-{algo}.png"))
}

/// One aggregated line of a performance chart: presort scheme name plus
/// (key count, filtered mean time in microseconds) points.
pub struct AlgoSeries {
    pub presort: String,
    pub points: Vec<(f64, f64)>,
}

/// Aggregate the result set into one series per presort scheme for the
/// given algorithm. Results whose runs cannot be averaged (e.g. a file
/// with a header but no runs) are warned about and left out.
pub fn algo_series(set: &ResultSet, algo: &str) -> Vec<AlgoSeries> {
    let mut series = Vec::new();

    for presort in set.presorts() {
        let mut points = Vec::new();
        for result in set.select(&presort, algo) {
            match result.average_nsec(stats::DEFAULT_OUTLIER_THRESHOLD) {
                Ok(nsec) => points.push((result.key_nr as f64, nsec * 1e-3)),
                Err(e) => eprintln!(
                    "skipping keynr={} presort={presort} algo={algo}: {e}",
                    result.key_nr
                ),
            }
        }
        if !points.is_empty() {
            series.push(AlgoSeries { presort, points });
        }
    }

    series
}

/// Render the per-algorithm line chart: one series per presort scheme,
/// key count on a log-scaled x axis, filtered mean time in microseconds
/// on the y axis. Returns the path of the written PNG.
pub fn plot_algo(dir: &Path, algo: &str, set: &ResultSet) -> Result<PathBuf, String> {
    let series = algo_series(set, algo);
    if series.is_empty() {
        return Err(format!("no results for algorithm {algo}"));
    }

    let x_max = series
        .iter()
        .flat_map(|s| s.points.iter())
        .map(|p| p.0)
        .fold(1.0f64, f64::max);
    let y_max = series
        .iter()
        .flat_map(|s| s.points.iter())
        .map(|p| p.1)
        .fold(0.0f64, f64::max)
        .max(1e-3);

    let path = algo_plot_path(dir, algo);
    let root = BitMapBackend::new(&path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| e.to_string())?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{algo} sorting performance by presort scheme"),
            ("sans-serif", 24),
        )
        .margin(12)
        .x_label_area_size(48)
        .y_label_area_size(72)
        .build_cartesian_2d((1.0f64..x_max * 1.1).log_scale(), 0.0f64..y_max * 1.1)
        .map_err(|e| e.to_string())?;

    chart
        .configure_mesh()
        .x_desc("Number of keys")
        .y_desc("Time (usec)")
        .x_label_formatter(&format_key_count)
        .draw()
        .map_err(|e| e.to_string())?;

    for (idx, s) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(LineSeries::new(
                s.points.iter().copied(),
                color.stroke_width(2),
            ))
            .map_err(|e| e.to_string())?
            .label(&s.presort)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2))
            });
        chart
            .draw_series(s.points.iter().map(|p| Circle::new(*p, 3, color.filled())))
            .map_err(|e| e.to_string())?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .draw()
        .map_err(|e| e.to_string())?;

    root.present().map_err(|e| e.to_string())?;
    // The backend keeps `path` borrowed until `root` drops.
    Ok(path.clone())
}

// Tick labels as power-of-two multiples with SI-ish prefixes.
fn format_key_count(keys: &f64) -> String {
    let keys = *keys;
    if keys >= (1u64 << 30) as f64 {
        format!("{:.0}Gi", keys / (1u64 << 30) as f64)
    } else if keys >= (1 << 20) as f64 {
        format!("{:.0}Mi", keys / (1 << 20) as f64)
    } else if keys >= (1 << 10) as f64 {
        format!("{:.0}Ki", keys / (1 << 10) as f64)
    } else {
        format!("{keys:.0}")
    }
}

/// Cumulative ordering trace and run-length distribution of a generated key
/// sequence, written as `{base_path}.png`. Visual sanity check that a
/// presort scheme produced the intended amount of disorder.
pub fn plot_ordering(keys: &[u32], title: &str, base_path: &Path) -> Result<PathBuf, String> {
    // Direction of each adjacent step: +1 non-decreasing, -1 decreasing.
    // The cumulative trace additionally treats equal neighbors as flat.
    let (cum, lens) = if keys.len() > 1 {
        let mut cum = Vec::with_capacity(keys.len() - 1);
        let mut total = 0i64;
        for w in keys.windows(2) {
            total += match w[1].cmp(&w[0]) {
                std::cmp::Ordering::Greater => 1,
                std::cmp::Ordering::Less => -1,
                std::cmp::Ordering::Equal => 0,
            };
            cum.push(total);
        }

        let dirs: Vec<i64> = keys
            .windows(2)
            .map(|w| if w[1] >= w[0] { 1 } else { -1 })
            .collect();
        let mut lens = vec![dirs[0]];
        for pair in dirs.windows(2) {
            if pair[1] != pair[0] {
                lens.push(pair[1]);
            } else {
                *lens.last_mut().unwrap() += pair[1];
            }
        }

        (cum, lens)
    } else {
        (vec![0], vec![0])
    };

    let path = base_path.with_extension("png");
    let root = BitMapBackend::new(&path, (1024, 900)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| e.to_string())?;
    let chart_area = root
        .titled(title, ("sans-serif", 24))
        .map_err(|e| e.to_string())?;

    let (upper, lower) = chart_area.split_vertically(430);

    let cum_min = *cum.iter().min().unwrap_or(&0);
    let cum_max = *cum.iter().max().unwrap_or(&0);
    let mut trace = ChartBuilder::on(&upper)
        .margin(36)
        .x_label_area_size(48)
        .y_label_area_size(64)
        .build_cartesian_2d(
            0.0f64..cum.len() as f64,
            (cum_min - 1) as f64..(cum_max + 1) as f64,
        )
        .map_err(|e| e.to_string())?;
    trace
        .configure_mesh()
        .x_desc("sequence number")
        .y_desc("cumulative ordering")
        .draw()
        .map_err(|e| e.to_string())?;
    trace
        .draw_series(LineSeries::new(
            cum.iter()
                .enumerate()
                .map(|(i, &c)| ((i + 1) as f64, c as f64)),
            BLUE.stroke_width(2),
        ))
        .map_err(|e| e.to_string())?;

    let len_min = *lens.iter().min().unwrap_or(&0) as i32;
    let len_max = *lens.iter().max().unwrap_or(&0) as i32;
    let weight = 1.0 / lens.len() as f64;
    let mut hist = ChartBuilder::on(&lower)
        .margin(36)
        .x_label_area_size(48)
        .y_label_area_size(64)
        .build_cartesian_2d((len_min..len_max + 1).into_segmented(), 0.0f64..1.1f64)
        .map_err(|e| e.to_string())?;
    hist.configure_mesh()
        .x_desc("ordering length")
        .y_desc("ordering length ratio")
        .draw()
        .map_err(|e| e.to_string())?;
    hist.draw_series(
        Histogram::vertical(&hist)
            .style(GREEN.filled())
            .margin(4)
            .data(lens.iter().map(|&l| (l as i32, weight))),
    )
    .map_err(|e| e.to_string())?;

    root.present().map_err(|e| e.to_string())?;
    // The backend keeps `path` borrowed until `root` drops.
    Ok(path.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{PerfResult, PerfRun};

    fn result(key_nr: u64, presort: &str, algo: &str, nsec: u32) -> PerfResult {
        PerfResult {
            key_type: "int".to_string(),
            key_nr,
            presort: presort.to_string(),
            algo: algo.to_string(),
            runs: vec![PerfRun { nsec, cmp: None, swap: None }],
        }
    }

    #[test]
    fn series_group_by_presort_and_scale_to_usec() {
        let mut set = ResultSet::new();
        set.register(result(1024, "fullrev", "merge", 4000));
        set.register(result(8, "fullrev", "merge", 1000));
        set.register(result(8, "fullin", "merge", 2000));
        set.register(result(8, "fullin", "bubble", 9000));

        let series = algo_series(&set, "merge");
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].presort, "fullin");
        assert_eq!(series[0].points, vec![(8.0, 2.0)]);
        assert_eq!(series[1].presort, "fullrev");
        assert_eq!(series[1].points, vec![(8.0, 1.0), (1024.0, 4.0)]);
    }

    #[test]
    fn plot_algo_writes_a_png() {
        let dir = tempfile::tempdir().unwrap();
        let mut set = ResultSet::new();
        for key_nr in [8u64, 64, 512] {
            set.register(result(key_nr, "fullrev", "merge", 1000 * key_nr as u32));
            set.register(result(key_nr, "random", "merge", 1500 * key_nr as u32));
        }

        let path = plot_algo(dir.path(), "merge", &set).unwrap();
        assert_eq!(path, dir.path().join("type-int_algo-merge.png"));
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn plot_algo_without_results_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(plot_algo(dir.path(), "merge", &ResultSet::new()).is_err());
    }

    #[test]
    fn plot_ordering_writes_a_png() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("type-int_keynr-6_presort-even");
        let keys = [5u32, 6, 4, 3, 7, 8];

        let path = plot_ordering(&keys, "presort: even #keys: 6", &base).unwrap();
        assert_eq!(path, dir.path().join("type-int_keynr-6_presort-even.png"));
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn plot_ordering_handles_degenerate_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("single");
        assert!(plot_ordering(&[42], "one key", &base).is_ok());
    }
}
