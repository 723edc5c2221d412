use std::cmp::max;
use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::color::{ColoringInstance, Coloring, VertexId, count_conflicts, nb_colors};
use crate::report::{SnapshotSink, NoSnapshot};
use crate::search::palette::{PaletteRepair, RepairOutcome, reduce_palette, initial_coloring, first_fit};

/// final temperature of the cooling schedule
pub const MIN_TEMPERATURE:f64 = 1e-4;

/// smallest accepted initial temperature
const LOWEST_INITIAL_TEMPERATURE:f64 = 1e-3;

/// largest accepted initial temperature
const HIGHEST_INITIAL_TEMPERATURE:f64 = 1e6;

/// minimum number of iterations for each number of colors
const MIN_ITERATIONS:usize = 1000;

/// number of tries to draw a color different from the current one
const NB_COLOR_DRAWS:usize = 10;


/// presets of the annealing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnealingMode {
    /// 50 iterations per vertex, T0 = 1
    Default,
    /// 20 iterations per vertex, T0 = 0.5
    Speed,
    /// 100 iterations per vertex, T0 = 0.8
    Precision,
    /// 200 iterations per vertex, T0 = 2
    Heavy,
}

impl FromStr for AnnealingMode {
    type Err = String;

    fn from_str(s:&str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "speed" => Ok(Self::Speed),
            "precision" => Ok(Self::Precision),
            "heavy" => Ok(Self::Heavy),
            _ => Err(format!("unknown annealing mode {} (valid: default, speed, precision, heavy)", s)),
        }
    }
}

impl fmt::Display for AnnealingMode {
    fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Default => "default",
            Self::Speed => "speed",
            Self::Precision => "precision",
            Self::Heavy => "heavy",
        };
        write!(f, "{}", name)
    }
}


/** parameters of the simulated annealing */
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnealingConfig {
    /// number of iterations per vertex (for each number of colors)
    pub iteration_multiplier: usize,
    /// initial temperature
    pub initial_temperature: f64,
}

impl Default for AnnealingConfig {
    fn default() -> Self { Self::from_mode(AnnealingMode::Default) }
}

impl AnnealingConfig {
    /// parameters of a preset
    pub fn from_mode(mode:AnnealingMode) -> Self {
        let (iteration_multiplier, initial_temperature) = match mode {
            AnnealingMode::Default => (50, 1.0),
            AnnealingMode::Speed => (20, 0.5),
            AnnealingMode::Precision => (100, 0.8),
            AnnealingMode::Heavy => (200, 2.0),
        };
        Self { iteration_multiplier, initial_temperature }
    }

    /// sets the number of iterations per vertex (at least 1)
    pub fn with_iteration_multiplier(mut self, multiplier:usize) -> Self {
        self.iteration_multiplier = max(1, multiplier);
        self
    }

    /// sets the initial temperature (clamped to [1e-3, 1e6])
    pub fn with_initial_temperature(mut self, t:f64) -> Self {
        self.initial_temperature = if t.is_nan() {
            Self::default().initial_temperature
        } else {
            t.max(LOWEST_INITIAL_TEMPERATURE).min(HIGHEST_INITIAL_TEMPERATURE)
        };
        self
    }

    /// number of iterations for a graph with n vertices
    pub fn nb_iterations(&self, n:usize) -> usize {
        max(MIN_ITERATIONS, self.iteration_multiplier.saturating_mul(n))
    }

    /// geometric cooling factor reaching MIN_TEMPERATURE after nb_iterations
    pub fn cooling_factor(&self, nb_iterations:usize) -> f64 {
        (MIN_TEMPERATURE / self.initial_temperature).powf(1. / nb_iterations as f64)
    }
}


/** best coloring seen during the whole search: fewest conflicts, then fewest colors */
#[derive(Debug, Clone)]
struct BestState {
    nb_conflicts: usize,
    nb_colors: usize,
    coloring: Coloring,
}

/** simulated annealing repairing colorings with a fixed number of colors */
struct Annealing<'a, R:Rng, S:SnapshotSink+?Sized> {
    inst: &'a dyn ColoringInstance,
    config: AnnealingConfig,
    rng: &'a mut R,
    snapshots: &'a mut S,
    best_overall: Option<BestState>,
}

impl<'a, R:Rng, S:SnapshotSink+?Sized> Annealing<'a, R, S> {

    /// records the coloring if it beats the best coloring seen so far
    fn update_best_overall(&mut self, coloring:&[usize], nb_conflicts:usize) {
        let key = (nb_conflicts, nb_colors(coloring));
        let improves = match &self.best_overall {
            None => true,
            Some(best) => key < (best.nb_conflicts, best.nb_colors),
        };
        if improves {
            self.best_overall = Some(BestState {
                nb_conflicts, nb_colors: key.1, coloring: coloring.to_vec()
            });
        }
    }

    /// called on each accepted move: the coloring may tie the best conflict count with fewer colors
    fn record_accepted(&mut self, coloring:&[usize], nb_conflicts:usize) {
        let candidate = self.best_overall.as_ref().map_or(true, |best| nb_conflicts <= best.nb_conflicts);
        if candidate {
            self.update_best_overall(coloring, nb_conflicts);
        }
    }

    /// draws a color in 0..k different from c if possible (k ≥ 2)
    fn propose_color(&mut self, c:usize, k:usize) -> usize {
        for _ in 0..NB_COLOR_DRAWS {
            let candidate = self.rng.gen_range(0..k);
            if candidate != c { return candidate; }
        }
        (0..k).find(|candidate| *candidate != c).unwrap_or(c)
    }

    /// variation of the number of conflicts if v takes color c_next
    fn delta(&self, colors:&[usize], v:VertexId, c_next:usize) -> i64 {
        let c_prev = colors[v];
        let mut delta:i64 = 0;
        for u in self.inst.neighbors(v) {
            if colors[*u] == c_next { delta += 1; }
            if colors[*u] == c_prev { delta -= 1; }
        }
        delta
    }
}

impl<'a, R:Rng, S:SnapshotSink+?Sized> PaletteRepair for Annealing<'a, R, S> {
    fn repair(&mut self, k:usize) -> RepairOutcome {
        let n = self.inst.nb_vertices();
        let mut colors = initial_coloring(self.inst, k, &mut *self.rng);
        let mut nb_conflicts = count_conflicts(self.inst, &colors);
        self.update_best_overall(&colors, nb_conflicts);
        if nb_conflicts == 0 {
            return RepairOutcome::Feasible(colors);
        }
        if k == 1 { // no move available
            return RepairOutcome::Infeasible { best: colors, nb_conflicts };
        }
        let nb_iterations = self.config.nb_iterations(n);
        let alpha = self.config.cooling_factor(nb_iterations);
        let mut temperature = self.config.initial_temperature;
        let mut best_nb_conflicts = nb_conflicts;
        let mut best_colors = colors.clone();
        for _ in 0..nb_iterations {
            let v = self.rng.gen_range(0..n);
            let c_next = self.propose_color(colors[v], k);
            let delta = self.delta(&colors, v, c_next);
            let accept = delta <= 0
                || self.rng.gen::<f64>() < (-(delta as f64) / temperature).exp();
            if accept {
                colors[v] = c_next;
                nb_conflicts = (nb_conflicts as i64 + delta) as usize;
                debug_assert_eq!(nb_conflicts, count_conflicts(self.inst, &colors));
                self.record_accepted(&colors, nb_conflicts);
                if nb_conflicts < best_nb_conflicts {
                    best_nb_conflicts = nb_conflicts;
                    best_colors.copy_from_slice(&colors);
                    self.snapshots.snapshot_complete(&colors);
                }
            }
            temperature *= alpha;
            if nb_conflicts == 0 { break; }
        }
        if nb_conflicts == 0 {
            RepairOutcome::Feasible(colors)
        } else {
            RepairOutcome::Infeasible { best: best_colors, nb_conflicts: best_nb_conflicts }
        }
    }
}


/**
Runs a simulated annealing with a decreasing number of colors, starting from Δ+1.
For each number of colors k, a random vertex takes a random other color. Improving moves
are always accepted, others with probability exp(-Δ/T). The temperature decreases
geometrically from T0 to 1e-4 over max(1000, multiplier.n) iterations.
Stops at the first k for which no conflict-free coloring is found, and returns the
conflict-free coloring of the previous k (or the best coloring seen if none is conflict-free).
*/
pub fn simulated_annealing<R:Rng>(inst:&dyn ColoringInstance, config:&AnnealingConfig, rng:&mut R) -> Coloring {
    simulated_annealing_with_snapshots(inst, config, rng, &mut NoSnapshot)
}

/** simulated annealing, reporting each improving move and the final coloring */
pub fn simulated_annealing_with_snapshots<R:Rng>(
    inst:&dyn ColoringInstance,
    config:&AnnealingConfig,
    rng:&mut R,
    snapshots:&mut dyn SnapshotSink,
) -> Coloring {
    if inst.nb_vertices() == 0 { return Vec::new(); }
    let mut search = Annealing {
        inst,
        config: *config,
        rng,
        snapshots: &mut *snapshots,
        best_overall: None,
    };
    let reduction = reduce_palette(inst, &mut search);
    let best_overall = search.best_overall.take();
    let res = match (reduction.best_feasible, best_overall, reduction.failure) {
        (Some((_, coloring)), _, _) => coloring,
        (None, Some(best), _) => best.coloring,
        (None, None, Some((_, coloring, _))) => coloring,
        (None, None, None) => first_fit(inst),
    };
    snapshots.snapshot_complete(&res);
    res
}


#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::color::{checker, CheckerResult};
    use crate::generators;

    fn run(inst:&dyn ColoringInstance, seed:u64) -> Coloring {
        simulated_annealing(inst, &AnnealingConfig::default(), &mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_config() {
        let config = AnnealingConfig::default();
        assert_eq!(config.iteration_multiplier, 50);
        assert!((config.initial_temperature - 1.0).abs() < 1e-12);
        assert_eq!(config.nb_iterations(10), 1000);
        assert_eq!(config.nb_iterations(100), 5000);
        let alpha = config.cooling_factor(1000);
        assert!((alpha.powi(1000) - MIN_TEMPERATURE).abs() < 1e-9);
        let clamped = config.with_iteration_multiplier(0).with_initial_temperature(-3.);
        assert_eq!(clamped.iteration_multiplier, 1);
        assert!((clamped.initial_temperature - 1e-3).abs() < 1e-12);
    }

    #[test]
    fn test_modes() {
        assert_eq!("heavy".parse::<AnnealingMode>(), Ok(AnnealingMode::Heavy));
        assert!("slow".parse::<AnnealingMode>().is_err());
        assert_eq!(AnnealingMode::Speed.to_string(), "speed");
        let speed = AnnealingConfig::from_mode(AnnealingMode::Speed);
        assert_eq!(speed.iteration_multiplier, 20);
    }

    #[test]
    fn test_trivial_graphs() {
        assert!(run(&generators::empty(0), 0).is_empty());
        assert_eq!(run(&generators::empty(1), 0), vec![0]);
        assert_eq!(run(&generators::empty(4), 0), vec![0 ; 4]);
    }

    #[test]
    fn test_known_chromatic_numbers() {
        assert_eq!(nb_colors(&run(&generators::complete(3), 1)), 3);
        assert_eq!(nb_colors(&run(&generators::complete(6), 2)), 6);
        assert_eq!(nb_colors(&run(&generators::star(5), 3)), 2);
        assert_eq!(nb_colors(&run(&generators::path(4), 4)), 2);
    }

    #[test]
    fn test_random_graph_valid_and_seeded() {
        let inst = generators::erdos_renyi(40, 0.25, &mut StdRng::seed_from_u64(4));
        let coloring = run(&inst, 8);
        match checker(&inst, &coloring) {
            CheckerResult::Ok(k) => assert!(k <= inst.max_degree()+1),
            other => panic!("invalid coloring: {:?}", other),
        }
        assert_eq!(coloring, run(&inst, 8));
    }

    #[test]
    fn test_propose_color_differs() {
        let inst = generators::path(3);
        let mut rng = StdRng::seed_from_u64(0);
        let mut snapshots = NoSnapshot;
        let mut search = Annealing {
            inst: &inst,
            config: AnnealingConfig::default(),
            rng: &mut rng,
            snapshots: &mut snapshots,
            best_overall: None,
        };
        for c in 0..2 {
            assert_ne!(search.propose_color(c, 2), c);
        }
        assert_eq!(search.delta(&[0, 0, 1], 0, 1), -1);
        assert_eq!(search.delta(&[0, 0, 1], 1, 1), 0);
    }

    #[test]
    fn test_best_overall_prefers_fewer_conflicts_then_colors() {
        let inst = generators::path(3);
        let mut rng = StdRng::seed_from_u64(0);
        let mut snapshots = NoSnapshot;
        let mut search = Annealing {
            inst: &inst,
            config: AnnealingConfig::default(),
            rng: &mut rng,
            snapshots: &mut snapshots,
            best_overall: None,
        };
        search.update_best_overall(&[0, 0, 0], 2);
        search.update_best_overall(&[0, 1, 2], 0);
        search.update_best_overall(&[1, 0, 1], 0);
        search.update_best_overall(&[0, 1, 3], 0);
        assert_eq!(search.best_overall.map(|b| b.coloring), Some(vec![1, 0, 1]));
    }

    #[test]
    fn test_accepted_move_with_equal_conflicts_and_fewer_colors() {
        let inst = generators::path(3);
        let mut rng = StdRng::seed_from_u64(0);
        let mut snapshots = NoSnapshot;
        let mut search = Annealing {
            inst: &inst,
            config: AnnealingConfig::default(),
            rng: &mut rng,
            snapshots: &mut snapshots,
            best_overall: None,
        };
        search.record_accepted(&[2, 2, 0], 1);
        // same conflict count, fewer colors
        search.record_accepted(&[1, 1, 0], 1);
        assert_eq!(search.best_overall.as_ref().map(|b| b.coloring.clone()), Some(vec![1, 1, 0]));
        // more conflicts: ignored
        search.record_accepted(&[0, 0, 0], 2);
        assert_eq!(search.best_overall.map(|b| (b.nb_conflicts, b.nb_colors)), Some((1, 2)));
    }

    proptest! {
        #[test]
        fn prop_valid_and_bounded(n in 1usize..25, p in 0.0f64..1.0, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let inst = generators::erdos_renyi(n, p, &mut rng);
            let config = AnnealingConfig::default().with_iteration_multiplier(1);
            let coloring = simulated_annealing(&inst, &config, &mut rng);
            match checker(&inst, &coloring) {
                CheckerResult::Ok(k) => {
                    prop_assert!(k <= inst.max_degree() + 1);
                    prop_assert!(k <= n);
                },
                other => prop_assert!(false, "invalid coloring: {:?}", other),
            }
        }
    }
}
