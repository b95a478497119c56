use log::info;
use ridgecv::{CrossValidator, DEFAULT_FOLDS, DEFAULT_SEED, PipelineOptions, RegressionPipeline, Table};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Semicolon-separated, one header line, last column is the target.
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/Daily_Demand_Forecasting_Orders.csv".to_string());
    let table = Table::from_path(&path, ';')?;
    info!("loaded {} rows x {} columns from {}", table.n_rows(), table.n_attributes(), path);

    let mut pipeline = RegressionPipeline::new(PipelineOptions::new().ridge(1e-8));
    pipeline.fit(&table)?;

    let result = pipeline.cross_validate(&CrossValidator::new(DEFAULT_FOLDS).seed(DEFAULT_SEED))?;
    println!("Root mean squared error (RMSE): {:e}", result.root_mean_squared_error());
    println!("Mean absolute error (MAE):      {:e}", result.mean_absolute_error());

    let row = table.row(0);
    let expected = row[row.len() - 1];
    let prediction = pipeline.predict(&row)?;
    println!("First row: expected {}, predicted {}", expected, prediction);

    if let Some(model) = pipeline.model() {
        println!("Coefficients: {}", model.coefficients());
        println!("Intercept: {:.6}", model.intercept());
    }

    Ok(())
}
