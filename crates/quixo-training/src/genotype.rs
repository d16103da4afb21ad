//! Move-preference genotypes and their genetic operators.
//!
//! A [`Genotype`] holds one [`Gene`] per move that is legal on the empty board (44
//! in total), always in [`Move::candidates`] order. Genetic operators never add,
//! drop or reorder genes: crossover picks each gene from one of the parents at the
//! same position, and mutations only touch weights.
//!
//! # Operations
//!
//! - **Initialization**: [`Genotype::random`] draws every weight from `0..=100`
//! - **Crossover**: [`crossover_single_point`], [`crossover_two_point`]
//! - **Mutation**: [`mutate_random_reset`], [`mutate_swap`], [`mutate_shift`]
//!
//! All operators take the per-gene probability `rate` in `[0, 1]`.

use quixo_engine::{Board, GameState, Move, PlayerId};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const MAX_INITIAL_WEIGHT: i32 = 100;

/// Largest absolute change applied by [`mutate_random_reset`].
pub const RANDOM_RESET_SPAN: i32 = 19;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene {
    pub mv: Move,
    pub weight: i32,
    /// How often the move was played during fitness evaluation.
    pub usage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genotype {
    genes: Vec<Gene>,
}

impl Genotype {
    /// Creates a genotype covering every empty-board move with random weights and zero usage.
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let genes = Board::EMPTY
            .legal_moves(PlayerId::Zero)
            .into_iter()
            .map(|mv| Gene {
                mv,
                weight: rng.random_range(0..=MAX_INITIAL_WEIGHT),
                usage: 0,
            })
            .collect();
        Self { genes }
    }

    #[must_use]
    pub fn from_genes(genes: Vec<Gene>) -> Self {
        Self { genes }
    }

    #[must_use]
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn reset_usage(&mut self) {
        for gene in &mut self.genes {
            gene.usage = 0;
        }
    }

    /// Picks the highest-weight gene that is legal in `state`, records one use of it
    /// and returns its move.
    ///
    /// Ties go to the gene that comes first.
    pub fn play_by_weight(&mut self, state: &GameState) -> Option<Move> {
        let index = self.best_legal_index(state, |gene| i64::from(gene.weight))?;
        let gene = &mut self.genes[index];
        gene.usage += 1;
        Some(gene.mv)
    }

    /// Returns the legal move maximizing `weight × usage`, ties going to the gene that
    /// comes first.
    #[must_use]
    pub fn best_by_score(&self, state: &GameState) -> Option<Move> {
        self.best_legal_index(state, |gene| {
            i64::from(gene.weight) * i64::from(gene.usage)
        })
        .map(|index| self.genes[index].mv)
    }

    fn best_legal_index<F>(&self, state: &GameState, key: F) -> Option<usize>
    where
        F: Fn(&Gene) -> i64,
    {
        let mut best: Option<(usize, i64)> = None;
        for (index, gene) in self.genes.iter().enumerate() {
            if !state.is_legal(gene.mv) {
                continue;
            }
            let value = key(gene);
            if best.is_none_or(|(_, best_value)| value > best_value) {
                best = Some((index, value));
            }
        }
        best.map(|(index, _)| index)
    }
}

/// Takes the genes before a random point from `p1` and the rest from `p2`.
///
/// # Panics
///
/// Panics if the parents differ in length or are empty.
pub fn crossover_single_point<R>(p1: &[Gene], p2: &[Gene], rng: &mut R) -> Vec<Gene>
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.len(), p2.len());
    assert!(!p1.is_empty());
    let point = rng.random_range(0..p1.len());
    p1[..point].iter().chain(&p2[point..]).copied().collect()
}

/// Takes the genes between two distinct random points from `p2` and the rest from `p1`.
///
/// # Panics
///
/// Panics if the parents differ in length or hold fewer than two genes.
pub fn crossover_two_point<R>(p1: &[Gene], p2: &[Gene], rng: &mut R) -> Vec<Gene>
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.len(), p2.len());
    assert!(p1.len() >= 2);
    let a = rng.random_range(0..p1.len());
    let b = loop {
        let b = rng.random_range(0..p1.len());
        if b != a {
            break b;
        }
    };
    let (start, end) = (a.min(b), a.max(b));
    p1[..start]
        .iter()
        .chain(&p2[start..end])
        .chain(&p1[end..])
        .copied()
        .collect()
}

/// Adds a uniform offset in `-19..=19` to each weight with probability `rate`.
pub fn mutate_random_reset<R>(genes: &mut [Gene], rate: f64, rng: &mut R)
where
    R: Rng + ?Sized,
{
    for gene in genes {
        if rng.random_bool(rate) {
            gene.weight += rng.random_range(-RANDOM_RESET_SPAN..=RANDOM_RESET_SPAN);
        }
    }
}

/// With probability `rate` per position, swaps its weight with a random later gene.
pub fn mutate_swap<R>(genes: &mut [Gene], rate: f64, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let len = genes.len();
    for i in 0..len.saturating_sub(1) {
        if rng.random_bool(rate) {
            let j = rng.random_range(i + 1..len);
            let (wi, wj) = (genes[i].weight, genes[j].weight);
            genes[i].weight = wj;
            genes[j].weight = wi;
        }
    }
}

/// With probability `rate` per position, rotates all weights left by a random offset.
///
/// The offset is drawn from `1..len - 3`, so the first gene's weight always moves
/// and the last few genes never become the head. Genotypes shorter than five genes
/// are left alone.
pub fn mutate_shift<R>(genes: &mut [Gene], rate: f64, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let len = genes.len();
    if len < 5 {
        return;
    }
    let mut weights: Vec<i32> = genes.iter().map(|g| g.weight).collect();
    for _ in 0..len - 1 {
        if rng.random_bool(rate) {
            let start = rng.random_range(1..len - 3);
            weights.rotate_left(start);
        }
    }
    for (gene, weight) in genes.iter_mut().zip(weights) {
        gene.weight = weight;
    }
}

#[cfg(test)]
mod tests {
    use quixo_engine::MAX_LEGAL_MOVES;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;

    fn genes_with_weights(weights: impl IntoIterator<Item = i32>) -> Vec<Gene> {
        Board::EMPTY
            .legal_moves(PlayerId::Zero)
            .into_iter()
            .zip(weights)
            .map(|(mv, weight)| Gene {
                mv,
                weight,
                usage: 0,
            })
            .collect()
    }

    fn sorted_weights(genes: &[Gene]) -> Vec<i32> {
        let mut weights: Vec<_> = genes.iter().map(|g| g.weight).collect();
        weights.sort_unstable();
        weights
    }

    #[test]
    fn test_random_covers_empty_board_moves() {
        let mut rng = Pcg32::seed_from_u64(0);
        let genotype = Genotype::random(&mut rng);
        assert_eq!(genotype.len(), MAX_LEGAL_MOVES);
        let moves: Vec<_> = genotype.genes().iter().map(|g| g.mv).collect();
        assert_eq!(moves.as_slice(), Board::EMPTY.legal_moves(PlayerId::Zero).as_slice());
        for gene in genotype.genes() {
            assert!((0..=MAX_INITIAL_WEIGHT).contains(&gene.weight));
            assert_eq!(gene.usage, 0);
        }
    }

    #[test]
    fn test_single_point_keeps_positions() {
        let mut rng = Pcg32::seed_from_u64(1);
        let p1 = genes_with_weights(0..44);
        let p2 = genes_with_weights(100..144);
        for _ in 0..20 {
            let child = crossover_single_point(&p1, &p2, &mut rng);
            assert_eq!(child.len(), p1.len());
            let split = child.iter().position(|g| g.weight >= 100).unwrap_or(child.len());
            for (i, gene) in child.iter().enumerate() {
                assert_eq!(gene.mv, p1[i].mv);
                let expected = if i < split { p1[i] } else { p2[i] };
                assert_eq!(*gene, expected);
            }
        }
    }

    #[test]
    fn test_two_point_takes_middle_from_second_parent() {
        let mut rng = Pcg32::seed_from_u64(2);
        let p1 = genes_with_weights(0..44);
        let p2 = genes_with_weights(100..144);
        for _ in 0..20 {
            let child = crossover_two_point(&p1, &p2, &mut rng);
            assert_eq!(child.len(), p1.len());
            let from_p2: Vec<usize> = (0..child.len()).filter(|i| child[*i] == p2[*i]).collect();
            assert!(!from_p2.is_empty());
            // the genes taken from the second parent form one contiguous run
            assert_eq!(from_p2.last().unwrap() - from_p2[0] + 1, from_p2.len());
            for (i, gene) in child.iter().enumerate() {
                if !from_p2.contains(&i) {
                    assert_eq!(*gene, p1[i]);
                }
            }
        }
    }

    #[test]
    fn test_random_reset_bounds() {
        let mut rng = Pcg32::seed_from_u64(3);
        let original = genes_with_weights(std::iter::repeat(50));
        let mut genes = original.clone();
        mutate_random_reset(&mut genes, 1.0, &mut rng);
        for (before, after) in original.iter().zip(&genes) {
            assert!((after.weight - before.weight).abs() <= RANDOM_RESET_SPAN);
            assert_eq!(after.mv, before.mv);
        }
    }

    #[test]
    fn test_zero_rate_is_identity() {
        let mut rng = Pcg32::seed_from_u64(4);
        let original = genes_with_weights(0..44);
        let mut genes = original.clone();
        mutate_random_reset(&mut genes, 0.0, &mut rng);
        mutate_swap(&mut genes, 0.0, &mut rng);
        mutate_shift(&mut genes, 0.0, &mut rng);
        assert_eq!(genes, original);
    }

    #[test]
    fn test_swap_and_shift_permute_weights() {
        let mut rng = Pcg32::seed_from_u64(5);
        let original = genes_with_weights(0..44);

        let mut swapped = original.clone();
        mutate_swap(&mut swapped, 0.5, &mut rng);
        assert_ne!(swapped, original);
        assert_eq!(sorted_weights(&swapped), sorted_weights(&original));

        let mut shifted = original.clone();
        mutate_shift(&mut shifted, 0.5, &mut rng);
        assert_eq!(sorted_weights(&shifted), sorted_weights(&original));
        // a rotation keeps neighbours together
        let weights: Vec<i32> = shifted.iter().map(|g| g.weight).collect();
        for pair in weights.windows(2) {
            assert!(pair[1] == (pair[0] + 1) % 44);
        }
        for (before, after) in original.iter().zip(&shifted) {
            assert_eq!(before.mv, after.mv);
        }
    }

    #[test]
    fn test_play_by_weight_records_usage() {
        let mut weights = vec![10; 44];
        weights[3] = 90;
        weights[7] = 90;
        let mut genotype = Genotype::from_genes(genes_with_weights(weights));
        let state = GameState::new();

        let mv = genotype.play_by_weight(&state).unwrap();
        assert_eq!(mv, genotype.genes()[3].mv);
        assert_eq!(genotype.genes()[3].usage, 1);
        assert_eq!(genotype.genes()[7].usage, 0);

        genotype.reset_usage();
        assert!(genotype.genes().iter().all(|g| g.usage == 0));
    }

    #[test]
    fn test_best_by_score_uses_weight_times_usage() {
        let mut genes = genes_with_weights(std::iter::repeat(1));
        genes[0].weight = 100;
        genes[0].usage = 1;
        genes[5].weight = 30;
        genes[5].usage = 4;
        let genotype = Genotype::from_genes(genes);
        assert_eq!(
            genotype.best_by_score(&GameState::new()),
            Some(genotype.genes()[5].mv)
        );
    }

    #[test]
    fn test_best_skips_illegal_genes() {
        // every border cell except the corners belongs to player 1
        let board: Board = "
            01110
            1...1
            1...1
            1...1
            01110
        "
        .parse()
        .unwrap();
        let state = GameState::from_parts(board, PlayerId::Zero);
        let mut genes = genes_with_weights(std::iter::repeat(1));
        // (0, 1) BOTTOM is the third empty-board move and illegal here
        genes[2].weight = 1000;
        genes[2].usage = 1000;
        let genotype = Genotype::from_genes(genes);
        let mv = genotype.best_by_score(&state).unwrap();
        assert!(state.is_legal(mv));
    }
}
