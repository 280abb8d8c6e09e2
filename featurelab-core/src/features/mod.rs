//! Feature computation: the indicator stage and the derived-feature stage,
//! assembled into a [`FeatureTable`].

pub mod derived_stage;
pub mod indicator_stage;
pub mod params;
pub mod table;

pub use derived_stage::{derived_stage, DerivedColumns, LagColumns, RollingColumns};
pub use indicator_stage::{
    indicator_stage, IndicatorColumns, MomentumColumns, TrendColumns, VolatilityColumns,
    VolumeColumns,
};
pub use table::{ColumnValues, FeatureColumn, FeatureTable};

use crate::domain::OhlcvTable;
use tracing::info;

/// Run both stages over `input` and assemble the feature table.
///
/// The stages only read `input`, so they run concurrently. Short histories
/// are not an error: windows that never fill stay NaN.
pub fn build_feature_table(input: &OhlcvTable) -> FeatureTable {
    let (indicators, derived) =
        rayon::join(|| indicator_stage(input), || derived_stage(input));
    let table = FeatureTable::assemble(input, indicators, derived);
    info!(
        symbol = table.symbol(),
        rows = table.len(),
        "feature table built"
    );
    table
}

/// Ordered column names of every feature table.
pub fn catalogue() -> Vec<String> {
    let empty = OhlcvTable::new("", Vec::new());
    FeatureTable::assemble(&empty, indicator_stage(&empty), derived_stage(&empty)).column_names()
}
