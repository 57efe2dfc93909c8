//! Разбиение на обучающую и тестовую выборки

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{PrepError, Result};

/// Позиции строк обучающей и тестовой выборок
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Перемешивает `0..n_samples` с фиксированным seed и отрезает тестовую часть.
///
/// Размер теста: `ceil(n_samples * test_size)`, обучение получает остаток.
/// Обе части непустые, иначе ошибка.
pub fn train_test_split(n_samples: usize, test_size: f64, seed: u64) -> Result<SplitIndices> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(PrepError::InvalidConfig(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }

    let n_test = (n_samples as f64 * test_size).ceil() as usize;
    let n_train = n_samples.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(PrepError::EmptyDataset(format!(
            "cannot split {} samples with test_size {}",
            n_samples, test_size
        )));
    }

    let mut positions: Vec<usize> = (0..n_samples).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    positions.shuffle(&mut rng);

    let train = positions.split_off(n_test);
    Ok(SplitIndices {
        train,
        test: positions,
    })
}
