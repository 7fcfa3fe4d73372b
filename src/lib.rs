pub mod adapter;
pub mod aggregation;
pub mod controller;
pub mod engine;
pub mod error;
pub mod filters;
pub mod predicate;
pub mod schema;
pub mod source;
pub mod visualization;

#[cfg(feature = "python")]
mod model;

pub use controller::{Dashboard, DashboardConfig, Dataset, Report, Screen, SessionState, UiHost};
pub use error::DashboardError;

#[cfg(feature = "python")]
mod python {
    use pyo3::prelude::*;
    use pyo3::types::PyModule;

    use crate::filters::FilterId;
    use crate::model::DashboardModel;
    use crate::schema::{self, Attribute};

    /// Export schema constants as Python submodules
    fn add_schema_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Canonical columns
        let employee = PyModule::new(m.py(), "employee")?;
        for attribute in Attribute::ALL {
            employee.add(attribute.name().to_uppercase().as_str(), attribute.name())?;
        }
        m.add_submodule(&employee)?;

        // Filter ids
        let filters = PyModule::new(m.py(), "filters")?;
        for id in FilterId::ALL {
            filters.add(id.as_str().to_uppercase().as_str(), id.as_str())?;
        }
        m.add_submodule(&filters)?;

        // Palette
        let palette = PyModule::new(m.py(), "palette")?;
        palette.add("YES", schema::palette::YES)?;
        palette.add("NO", schema::palette::NO)?;
        m.add_submodule(&palette)?;

        Ok(())
    }

    #[pymodule]
    fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_class::<DashboardModel>()?;
        add_schema_exports(m)?;
        Ok(())
    }
}
