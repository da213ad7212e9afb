use nalgebra_sparse::CsrMatrix;
use ndarray::{Array2, ArrayView1, Axis};
use single_utilities::traits::FloatOps;

use crate::data::{Adjustable, Feature, FeatureSet, FeatureUniverse};
use crate::error::EnrichmentError;

/// Dense feature × sample matrix of values (expression changes, scores, ...).
///
/// Rows are features, columns are samples. A single ranked vector is a matrix with one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileMatrix<F> {
    features: Vec<F>,
    samples: Vec<String>,
    values: Array2<f64>,
}

impl<F: Feature> ProfileMatrix<F> {
    /// Build a profile from a dense matrix.
    ///
    /// # Arguments
    ///
    /// * `features` - Row labels
    /// * `samples` - Column labels
    /// * `values` - Matrix of shape `(features.len(), samples.len())`
    pub fn new(
        features: Vec<F>,
        samples: Vec<String>,
        values: Array2<f64>,
    ) -> anyhow::Result<Self> {
        if values.nrows() != features.len() || values.ncols() != samples.len() {
            return Err(EnrichmentError::TypeMismatch {
                expected: format!("{} x {} matrix", features.len(), samples.len()),
                found: format!("{} x {} matrix", values.nrows(), values.ncols()),
            }
            .into());
        }
        Ok(ProfileMatrix {
            features,
            samples,
            values,
        })
    }

    /// Build a single-sample profile from a named vector.
    pub fn from_vector(name: &str, features: Vec<F>, values: Vec<f64>) -> anyhow::Result<Self> {
        let n = values.len();
        let values = Array2::from_shape_vec((n, 1), values)?;
        Self::new(features, vec![name.to_string()], values)
    }

    /// Build a profile from a sparse matrix (features × samples). Missing entries are zeros.
    pub fn from_csr<T>(
        matrix: &CsrMatrix<T>,
        features: Vec<F>,
        samples: Vec<String>,
    ) -> anyhow::Result<Self>
    where
        T: FloatOps,
    {
        let mut values = Array2::<f64>::zeros((matrix.nrows(), matrix.ncols()));
        for (row, col, value) in matrix.triplet_iter() {
            values[[row, col]] = num_traits::ToPrimitive::to_f64(value).ok_or_else(|| {
                anyhow::anyhow!("Value at ({}, {}) is not representable as f64", row, col)
            })?;
        }
        Self::new(features, samples, values)
    }

    pub fn features(&self) -> &[F] {
        &self.features
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn n_features(&self) -> usize {
        self.features.len()
    }

    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn column(&self, sample_idx: usize) -> ArrayView1<'_, f64> {
        self.values.column(sample_idx)
    }

    /// The features present in this profile, as a universe for re-adjusting references.
    pub fn feature_set(&self) -> FeatureSet<F> {
        self.features.iter().cloned().collect()
    }
}

impl<F: Feature> Adjustable<F> for ProfileMatrix<F> {
    /// Keep the rows whose feature is in `universe`, ordered by feature id.
    fn adjust(&self, universe: &FeatureUniverse<F>, _min_size: usize) -> Self {
        let mut kept: Vec<usize> = (0..self.features.len())
            .filter(|&i| universe.contains(&self.features[i]))
            .collect();
        kept.sort_by(|&a, &b| self.features[a].cmp(&self.features[b]));

        ProfileMatrix {
            features: kept.iter().map(|&i| self.features[i].clone()).collect(),
            samples: self.samples.clone(),
            values: self.values.select(Axis(0), &kept),
        }
    }
}
