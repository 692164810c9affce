//! Benchmarks backed by a precomputed table.

use hg_types::{
    BenchmarkError, ColumnKind, Config, ConfigSpace, FidelitySpec, HgResult, ParameterValue, Query,
    QueryResult, Trajectory,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

use crate::description::BenchmarkDescription;
use crate::table::Table;

/// Column the id key is exposed as; reserved for it.
pub const ID_COLUMN: &str = "id";

type FidelityKey = Vec<ParameterValue>;
type RowValues = BTreeMap<String, f64>;

/// A benchmark answered by lookups into a sorted index of table rows.
///
/// The index has one outer level per config id and, below it, one level per
/// declared fidelity in declaration order. An unconstrained fidelity means
/// "as much fidelity as available": the last row in sort order is taken,
/// which assumes ascending sort order equals ascending fidelity.
#[derive(Debug, Clone)]
pub struct TabularBenchmark {
    desc: BenchmarkDescription,
    id_key: String,
    config_keys: Vec<String>,
    result_keys: Vec<String>,
    fidelity_keys: Vec<String>,
    config_space: ConfigSpace,
    source_ids: BTreeMap<String, ParameterValue>,
    index: BTreeMap<String, BTreeMap<FidelityKey, RowValues>>,
}

impl TabularBenchmark {
    /// Build the index. Result and fidelity keys come from `desc`.
    pub fn new(
        desc: BenchmarkDescription,
        table: &Table,
        id_key: impl Into<String>,
        config_keys: Vec<String>,
    ) -> HgResult<Self> {
        let id_key = id_key.into();
        let result_keys = desc.result_keys();
        let fidelity_keys = desc.fidelity_keys();

        let missing = |kind: ColumnKind, key: &str| BenchmarkError::MissingColumn {
            kind,
            key: key.to_string(),
            benchmark: desc.name.clone(),
            columns: table.columns().to_vec(),
        };

        let config_cols = locate(table, &config_keys, |k| missing(ColumnKind::Config, k))?;
        let result_cols = locate(table, &result_keys, |k| missing(ColumnKind::Result, k))?;
        let fidelity_cols = locate(table, &fidelity_keys, |k| missing(ColumnKind::Fidelity, k))?;
        let id_col = table
            .column_index(&id_key)
            .ok_or_else(|| missing(ColumnKind::Id, &id_key))?;

        if table.has_column(ID_COLUMN) && id_key != ID_COLUMN {
            return Err(BenchmarkError::ReservedIdColumn {
                benchmark: desc.name.clone(),
                id_key,
            }
            .into());
        }

        // Canonical config space: distinct config values, sorted, enumerated.
        let distinct: BTreeSet<Vec<ParameterValue>> = table
            .rows()
            .iter()
            .map(|row| pick(row, &config_cols))
            .collect();
        let config_ids: BTreeMap<Vec<ParameterValue>, String> = distinct
            .into_iter()
            .enumerate()
            .map(|(i, values)| (values, i.to_string()))
            .collect();
        let configs: Vec<Config> = config_ids
            .iter()
            .map(|(values, id)| {
                let named = config_keys.iter().cloned().zip(values.iter().cloned()).collect();
                Config::new(id.clone(), named)
            })
            .collect();

        let mut index: BTreeMap<String, BTreeMap<FidelityKey, RowValues>> = BTreeMap::new();
        let mut source_ids = BTreeMap::new();
        for row in table.rows() {
            let config_id = config_ids[&pick(row, &config_cols)].clone();
            let fidelity = pick(row, &fidelity_cols);

            let mut values = RowValues::new();
            for (key, &col) in result_keys.iter().zip(&result_cols) {
                let value = row[col].as_f64().ok_or_else(|| BenchmarkError::NonNumeric {
                    benchmark: desc.name.clone(),
                    column: key.clone(),
                    value: row[col].to_string(),
                })?;
                values.insert(key.clone(), value);
            }

            source_ids
                .entry(config_id.clone())
                .or_insert_with(|| row[id_col].clone());

            let rows = index.entry(config_id.clone()).or_default();
            if rows.contains_key(&fidelity) {
                return Err(BenchmarkError::DuplicateRow {
                    benchmark: desc.name.clone(),
                    config_id,
                    fidelity: fidelity.iter().map(ToString::to_string).collect(),
                }
                .into());
            }
            rows.insert(fidelity, values);
        }

        info!(
            "Indexed tabular benchmark {}: {} configs, {} rows, fidelities {:?}",
            desc.name,
            configs.len(),
            table.num_rows(),
            fidelity_keys
        );

        Ok(Self {
            desc,
            id_key,
            config_keys,
            result_keys,
            fidelity_keys,
            config_space: ConfigSpace::Listed(configs),
            source_ids,
            index,
        })
    }

    pub fn desc(&self) -> &BenchmarkDescription {
        &self.desc
    }

    pub fn id_key(&self) -> &str {
        &self.id_key
    }

    pub fn config_keys(&self) -> &[String] {
        &self.config_keys
    }

    pub fn result_keys(&self) -> &[String] {
        &self.result_keys
    }

    pub fn fidelity_keys(&self) -> &[String] {
        &self.fidelity_keys
    }

    pub fn config_space(&self) -> &ConfigSpace {
        &self.config_space
    }

    pub fn configs(&self) -> &[Config] {
        match &self.config_space {
            ConfigSpace::Listed(configs) => configs,
            ConfigSpace::Search(_) => &[],
        }
    }

    /// The table's own id for a config.
    pub fn source_id(&self, config_id: &str) -> Option<&ParameterValue> {
        self.source_ids.get(config_id)
    }

    fn rows_of(&self, config_id: &str) -> HgResult<&BTreeMap<FidelityKey, RowValues>> {
        self.index.get(config_id).ok_or_else(|| {
            BenchmarkError::UnknownConfig {
                benchmark: self.desc.name.clone(),
                config_id: config_id.to_string(),
            }
            .into()
        })
    }

    pub fn query(&self, query: &Query) -> HgResult<QueryResult> {
        query.check_fidelity(&self.desc.name, &self.desc.fidelities)?;
        let rows = self.rows_of(query.config_id())?;

        // `None` selects every value of that fidelity dimension.
        let selectors: Vec<Option<&ParameterValue>> = self
            .fidelity_keys
            .iter()
            .map(|key| query.fidelity.as_ref().and_then(|spec| spec.pinned(key)))
            .collect();
        let fully_pinned = selectors.iter().all(Option::is_some);

        let mut matching = rows.iter().filter(|(fidelity, _)| {
            fidelity
                .iter()
                .zip(&selectors)
                .all(|(value, selector)| selector.map_or(true, |pinned| pinned == value))
        });

        let selected = if fully_pinned {
            matching.next()
        } else {
            matching.last()
        };
        let (row_fidelity, values) = selected.ok_or_else(|| BenchmarkError::NoMatchingRow {
            benchmark: self.desc.name.clone(),
            config_id: query.config_id().to_string(),
            fidelity: query
                .fidelity
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "None".to_string()),
        })?;

        let realized = self
            .fidelity_keys
            .iter()
            .zip(row_fidelity)
            .zip(&selectors)
            .map(|((key, from_row), selector)| {
                let value = selector.cloned().unwrap_or_else(|| from_row.clone());
                (key.clone(), value)
            })
            .collect();

        Ok(QueryResult::new(query.clone(), values.clone(), realized))
    }

    /// Rows of the queried config between `frm` and `to`, single fidelity only.
    pub fn trajectory(
        &self,
        query: &Query,
        frm: Option<&ParameterValue>,
        to: Option<&ParameterValue>,
    ) -> HgResult<Trajectory> {
        if self.fidelity_keys.is_empty() {
            return Err(BenchmarkError::NoFidelities {
                benchmark: self.desc.name.clone(),
            }
            .into());
        }

        let Some(FidelitySpec::Single(name, value)) = &query.fidelity else {
            return Err(BenchmarkError::FidelityShape {
                benchmark: self.desc.name.clone(),
                message: "a trajectory needs a (name, value) fidelity pair".to_string(),
            }
            .into());
        };

        if self.fidelity_keys.len() != 1 || &self.fidelity_keys[0] != name {
            return Err(BenchmarkError::TrajectoryNotImplemented {
                benchmark: self.desc.name.clone(),
                reason: format!(
                    "can't get a trajectory over '{name}' with fidelities {:?}",
                    self.fidelity_keys
                ),
            }
            .into());
        }

        let fidelity = self
            .desc
            .fidelities
            .get(name)
            .ok_or_else(|| BenchmarkError::UnknownFidelity {
                benchmark: self.desc.name.clone(),
                fidelity: name.clone(),
            })?;
        let frm = frm.cloned().unwrap_or_else(|| fidelity.min_value());
        let to = to.cloned().unwrap_or_else(|| value.clone());

        let rows = self.rows_of(query.config_id())?;
        let mut trajectory = Trajectory::new(name.clone());
        if frm > to {
            return Ok(trajectory);
        }
        for (at, values) in rows.range(vec![frm]..=vec![to]) {
            trajectory.push(at[0].clone(), values.clone());
        }
        Ok(trajectory)
    }
}

fn locate<F>(table: &Table, keys: &[String], missing: F) -> Result<Vec<usize>, BenchmarkError>
where
    F: Fn(&str) -> BenchmarkError,
{
    keys.iter()
        .map(|key| table.column_index(key).ok_or_else(|| missing(key)))
        .collect()
}

fn pick(row: &[ParameterValue], cols: &[usize]) -> Vec<ParameterValue> {
    cols.iter().map(|&c| row[c].clone()).collect()
}
