//! floorgrid Headless Layout Harness
//!
//! Validates grid layout and group ordering against a JSON scenario and a
//! seeded random stress run. Runs entirely in-process — no UI, no files
//! written.
//!
//! Usage:
//!   cargo run -p floorgrid-simtest
//!   cargo run -p floorgrid-simtest -- --verbose
//!   cargo run -p floorgrid-simtest -- --scenario path/to/scenario.json

use floorgrid_logic::config::{
    validate_cost_weights, validate_layout_config, CostWeights, LayoutConfig,
};
use floorgrid_logic::cost::CostMatrix;
use floorgrid_logic::fga::Fga;
use floorgrid_logic::grid::GridLayout;
use floorgrid_logic::occupancy::OccupancyMatrix;
use floorgrid_logic::ordering::solve_with;
use floorgrid_logic::packing::{area_spans, AreaSpan};
use floorgrid_logic::reservation::ClientHandle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Instant;

// ── Scenario (bundled default) ──────────────────────────────────────────
const SCENARIO_JSON: &str = include_str!("../../../data/sample_scenario.json");

#[derive(Debug, Deserialize)]
struct Scenario {
    name: String,
    #[serde(default)]
    layout: LayoutConfig,
    #[serde(default)]
    weights: CostWeights,
    clients: Vec<ClientSpec>,
    #[serde(default)]
    expected_rows_per_floor: Vec<usize>,
}

#[derive(Debug, Deserialize)]
struct ClientSpec {
    name: String,
    triples: Vec<Fga>,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    let scenario_path = args
        .iter()
        .position(|a| a == "--scenario")
        .and_then(|i| args.get(i + 1));

    println!("=== floorgrid Layout Harness ===\n");

    let json = match scenario_path {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Cannot read scenario {}: {}", path, e);
                std::process::exit(2);
            }
        },
        None => SCENARIO_JSON.to_string(),
    };

    let mut results = Vec::new();

    match serde_json::from_str::<Scenario>(&json) {
        Ok(scenario) => {
            println!("Scenario: {}\n", scenario.name);
            // 1. Configuration
            results.extend(validate_config(&scenario));
            // 2. Grid layout
            results.extend(validate_layout(&scenario, verbose));
            // 3. Client release
            results.extend(validate_release(&scenario));
            // 4. Group ordering
            results.extend(validate_ordering(&scenario, verbose));
        }
        Err(e) => results.push(TestResult {
            name: "scenario_parse".into(),
            passed: false,
            detail: format!("JSON parse error: {}", e),
        }),
    }

    // 5. Random stress
    results.extend(validate_stress(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

/// Largest number of spans covering a single group.
fn max_overlap(spans: &[AreaSpan]) -> usize {
    let lo = spans.iter().map(|s| s.start).min().unwrap_or(0);
    let hi = spans.iter().map(|s| s.end).max().unwrap_or(-1);
    (lo..=hi)
        .map(|g| spans.iter().filter(|s| s.start <= g && g <= s.end).count())
        .max()
        .unwrap_or(0)
}

fn all_placed(scenario: &Scenario) -> Vec<Fga> {
    scenario
        .clients
        .iter()
        .flat_map(|c| c.triples.iter().copied())
        .filter(Fga::is_placed)
        .collect()
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn validate_config(scenario: &Scenario) -> Vec<TestResult> {
    println!("--- Configuration ---");
    let mut errors = validate_layout_config(&scenario.layout);
    errors.extend(validate_cost_weights(&scenario.weights));
    vec![TestResult {
        name: "config_valid".into(),
        passed: errors.is_empty(),
        detail: if errors.is_empty() {
            format!(
                "cell {}×{}, weights {}/{}/{}",
                scenario.layout.cell_width,
                scenario.layout.cell_height,
                scenario.weights.absent,
                scenario.weights.shared_area,
                scenario.weights.conflicting_area
            )
        } else {
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        },
    }]
}

// ── 2. Grid layout ──────────────────────────────────────────────────────

fn validate_layout(scenario: &Scenario, verbose: bool) -> Vec<TestResult> {
    println!("--- Grid Layout ---");
    let mut results = Vec::new();

    let mut layout = GridLayout::new(&scenario.layout);
    let handles: Vec<ClientHandle> = scenario.clients.iter().map(|_| ClientHandle::new()).collect();
    for (handle, spec) in handles.iter().zip(&scenario.clients) {
        layout.update_reservation(handle, spec.triples.iter().copied());
    }
    let size = layout.measure(scenario.layout.cell_size());
    let grid = layout.grid();

    if verbose {
        println!(
            "  {} clients → {} rows × {} columns ({}×{})",
            scenario.clients.len(),
            grid.row_count(),
            grid.column_count(),
            size.width,
            size.height
        );
    }

    // Rows per floor are minimal
    let placed = all_placed(scenario);
    let mut by_floor: BTreeMap<i32, Vec<(i32, i32)>> = BTreeMap::new();
    for t in &placed {
        by_floor.entry(t.floor).or_default().push((t.group, t.area));
    }
    let mut not_minimal = Vec::new();
    for (floor, pairs) in &by_floor {
        let lower_bound = max_overlap(&area_spans(pairs.iter().copied()));
        if grid.rows_on_floor(*floor) != lower_bound {
            not_minimal.push(format!(
                "floor {}: {} rows, {} needed",
                floor,
                grid.rows_on_floor(*floor),
                lower_bound
            ));
        }
    }
    results.push(TestResult {
        name: "layout_rows_minimal".into(),
        passed: not_minimal.is_empty(),
        detail: if not_minimal.is_empty() {
            format!("{} floors packed optimally", by_floor.len())
        } else {
            not_minimal.join(", ")
        },
    });

    // Expected row counts from the scenario file
    if !scenario.expected_rows_per_floor.is_empty() {
        let actual: Vec<usize> = by_floor.keys().map(|f| grid.rows_on_floor(*f)).collect();
        results.push(TestResult {
            name: "layout_expected_rows".into(),
            passed: actual == scenario.expected_rows_per_floor,
            detail: format!(
                "expected {:?}, got {:?}",
                scenario.expected_rows_per_floor, actual
            ),
        });
    }

    // Columns follow sorted distinct groups
    let mut groups: Vec<i32> = placed.iter().map(|t| t.group).collect();
    groups.sort_unstable();
    groups.dedup();
    let columns_ok = groups
        .iter()
        .enumerate()
        .all(|(i, g)| grid.column_of(*g) == Some(i))
        && grid.column_count() == groups.len();
    results.push(TestResult {
        name: "layout_columns_sorted".into(),
        passed: columns_ok,
        detail: format!("{} distinct groups", groups.len()),
    });

    // Shared (floor, area) → same y; shared group → same x
    let mut misaligned = 0;
    for a in &placed {
        for b in &placed {
            let ra = layout.cell_rect(a.floor, a.group, a.area);
            let rb = layout.cell_rect(b.floor, b.group, b.area);
            if (a.floor, a.area) == (b.floor, b.area) && ra.y != rb.y {
                misaligned += 1;
            }
            if a.group == b.group && ra.x != rb.x {
                misaligned += 1;
            }
        }
    }
    results.push(TestResult {
        name: "layout_alignment".into(),
        passed: misaligned == 0,
        detail: format!("{} misaligned pairs", misaligned),
    });

    // Total size matches the grid
    let cell = scenario.layout.cell_size();
    results.push(TestResult {
        name: "layout_total_size".into(),
        passed: size.width == grid.column_count() as f64 * cell.width
            && size.height == grid.row_count() as f64 * cell.height,
        detail: format!("{}×{}", size.width, size.height),
    });

    results
}

// ── 3. Client release ───────────────────────────────────────────────────

fn validate_release(scenario: &Scenario) -> Vec<TestResult> {
    println!("--- Client Release ---");
    let mut results = Vec::new();
    let Some(last) = scenario.clients.last() else {
        return results;
    };

    let mut layout = GridLayout::new(&scenario.layout);
    let mut handles: Vec<ClientHandle> =
        scenario.clients.iter().map(|_| ClientHandle::new()).collect();
    for (handle, spec) in handles.iter().zip(&scenario.clients) {
        layout.update_reservation(handle, spec.triples.iter().copied());
    }
    layout.measure(scenario.layout.cell_size());

    handles.pop();
    layout.measure(scenario.layout.cell_size());

    let remaining: Vec<Fga> = scenario.clients[..scenario.clients.len() - 1]
        .iter()
        .flat_map(|c| c.triples.iter().copied())
        .collect();
    let reference = floorgrid_logic::grid::LayoutGrid::compute(remaining);

    results.push(TestResult {
        name: "release_excludes_client".into(),
        passed: layout.grid() == &reference && layout.store().len() == handles.len(),
        detail: format!(
            "dropped '{}', {} clients tracked",
            last.name,
            layout.store().len()
        ),
    });
    results
}

// ── 4. Group ordering ───────────────────────────────────────────────────

fn validate_ordering(scenario: &Scenario, verbose: bool) -> Vec<TestResult> {
    println!("--- Group Ordering ---");
    let mut results = Vec::new();

    let matrix = match OccupancyMatrix::from_triples(all_placed(scenario)) {
        Ok(m) => m,
        Err(e) => {
            results.push(TestResult {
                name: "ordering_matrix".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };
    let report = match solve_with(&matrix, &scenario.weights) {
        Ok(r) => r,
        Err(e) => {
            results.push(TestResult {
                name: "ordering_solve".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    if verbose {
        println!("  order: {:?}", report.order.as_slice());
    }

    let mut sorted = report.order.as_slice().to_vec();
    sorted.sort_unstable();
    results.push(TestResult {
        name: "ordering_permutation".into(),
        passed: sorted == (0..matrix.groups()).collect::<Vec<_>>(),
        detail: format!("{} groups", matrix.groups()),
    });

    let costs = CostMatrix::from_occupancy(&matrix, &scenario.weights);
    let seam_ok = report
        .order
        .as_slice()
        .windows(2)
        .all(|w| costs.get(w[0], w[1]) <= report.seam_cost);
    results.push(TestResult {
        name: "ordering_seam_costliest".into(),
        passed: seam_ok,
        detail: format!(
            "tour cost {}, seam cost {}",
            report.tour_cost, report.seam_cost
        ),
    });

    results.push(TestResult {
        name: "ordering_tour_cost".into(),
        passed: costs.cycle_cost(report.order.as_slice()) == report.tour_cost,
        detail: format!(
            "identity order costs {}, solved order {}",
            costs.cycle_cost(&(0..matrix.groups()).collect::<Vec<_>>()),
            report.tour_cost
        ),
    });

    results
}

// ── 5. Random stress ────────────────────────────────────────────────────

fn validate_stress(verbose: bool) -> Vec<TestResult> {
    println!("--- Random Stress ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(42);

    // Layout: 20 clients, 6 floors, 60 groups, 12 areas per floor
    let mut layout = GridLayout::default();
    let mut handles = Vec::new();
    for _ in 0..20 {
        let handle = ClientHandle::new();
        let triples: Vec<Fga> = (0..40)
            .map(|_| {
                Fga::new(
                    rng.gen_range(-1..6),
                    rng.gen_range(0..60),
                    rng.gen_range(0..12),
                )
            })
            .collect();
        layout.update_reservation(&handle, triples);
        handles.push(handle);
    }
    let start = Instant::now();
    layout.measure(LayoutConfig::default().cell_size());
    let layout_time = start.elapsed();

    let minimal = (0..6).all(|floor| {
        let pairs = layout
            .store()
            .placed()
            .filter(|t| t.floor == floor)
            .map(|t| (t.group, t.area));
        layout.grid().rows_on_floor(floor) == max_overlap(&area_spans(pairs))
    });
    results.push(TestResult {
        name: "stress_layout_minimal".into(),
        passed: minimal,
        detail: format!(
            "{} rows × {} columns in {:?}",
            layout.grid().row_count(),
            layout.grid().column_count(),
            layout_time
        ),
    });

    // Ordering: 80 groups × 8 floors
    let rows: Vec<Vec<u32>> = (0..80)
        .map(|_| (0..8).map(|_| rng.gen_range(0..4)).collect())
        .collect();
    let matrix = match OccupancyMatrix::from_rows(rows) {
        Ok(m) => m,
        Err(e) => {
            results.push(TestResult {
                name: "stress_ordering".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };
    let start = Instant::now();
    let outcome = solve_with(&matrix, &CostWeights::default());
    let solve_time = start.elapsed();
    match outcome {
        Ok(report) => {
            let mut sorted = report.order.into_vec();
            sorted.sort_unstable();
            if verbose {
                println!("  80 groups solved in {:?}", solve_time);
            }
            results.push(TestResult {
                name: "stress_ordering".into(),
                passed: sorted == (0..80).collect::<Vec<_>>(),
                detail: format!("tour cost {} in {:?}", report.tour_cost, solve_time),
            });
        }
        Err(e) => results.push(TestResult {
            name: "stress_ordering".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    results
}
