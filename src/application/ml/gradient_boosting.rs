use serde::{Deserialize, Serialize};
use smartcore::error::Failed;
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_regressor::{
    DecisionTreeRegressor, DecisionTreeRegressorParameters,
};

type Tree = DecisionTreeRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

#[derive(Debug, Clone, Copy)]
pub struct GradientBoostingParameters {
    pub n_rounds: usize,
    pub learning_rate: f64,
    pub max_depth: u16,
    pub min_samples_split: usize,
}

impl Default for GradientBoostingParameters {
    fn default() -> Self {
        Self {
            n_rounds: 100,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_split: 2,
        }
    }
}

/// Least-squares gradient boosting over shallow smartcore regression trees.
///
/// Starts from the target mean; every round fits a tree to the current
/// residuals and adds it with shrinkage `learning_rate`.
#[derive(Debug, Serialize, Deserialize)]
pub struct GradientBoostedTrees {
    base: f64,
    learning_rate: f64,
    trees: Vec<Tree>,
}

impl GradientBoostedTrees {
    pub fn fit(
        x: &DenseMatrix<f64>,
        y: &[f64],
        params: GradientBoostingParameters,
    ) -> Result<Self, Failed> {
        if y.is_empty() {
            return Err(Failed::because(
                smartcore::error::FailedError::FitFailed,
                "cannot boost on an empty target",
            ));
        }

        let base = y.iter().sum::<f64>() / y.len() as f64;
        let mut fitted = vec![base; y.len()];
        let mut trees = Vec::with_capacity(params.n_rounds);

        let tree_params = DecisionTreeRegressorParameters::default()
            .with_max_depth(params.max_depth)
            .with_min_samples_split(params.min_samples_split);

        for _ in 0..params.n_rounds {
            let residuals: Vec<f64> = y.iter().zip(&fitted).map(|(t, f)| t - f).collect();
            let tree = Tree::fit(x, &residuals, tree_params.clone())?;
            let step = tree.predict(x)?;
            for (f, s) in fitted.iter_mut().zip(&step) {
                *f += params.learning_rate * s;
            }
            trees.push(tree);
        }

        Ok(Self {
            base,
            learning_rate: params.learning_rate,
            trees,
        })
    }

    pub fn predict(&self, x: &DenseMatrix<f64>) -> Result<Vec<f64>, Failed> {
        let (rows, _) = x.shape();
        let mut out = vec![self.base; rows];
        for tree in &self.trees {
            let step = tree.predict(x)?;
            for (o, s) in out.iter_mut().zip(&step) {
                *o += self.learning_rate * s;
            }
        }
        Ok(out)
    }

    pub fn n_rounds(&self) -> usize {
        self.trees.len()
    }
}
