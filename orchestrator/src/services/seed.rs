//! Catalog fixtures inserted on first boot
//!
//! Variable names match the feature keys the compute service expects in
//! optimize ranges.

use shared::{NewVariable, VariableKind};

pub fn default_variables() -> Vec<NewVariable> {
    vec![
        NewVariable::new("収率", VariableKind::Output)
            .with_description("Reaction yield")
            .with_unit("%")
            .with_bounds(0.0, 100.0)
            .with_default(50.0),
        NewVariable::new("温度", VariableKind::Input)
            .with_description("Reaction temperature")
            .with_unit("°C")
            .with_bounds(50.0, 150.0)
            .with_default(100.0),
        NewVariable::new("圧力", VariableKind::Input)
            .with_description("Reactor pressure")
            .with_unit("MPa")
            .with_bounds(1.0, 10.0)
            .with_default(5.0),
        NewVariable::new("触媒量", VariableKind::Input)
            .with_description("Catalyst loading")
            .with_unit("g")
            .with_bounds(0.1, 2.0)
            .with_default(1.0),
        NewVariable::new("反応時間", VariableKind::Input)
            .with_description("Reaction time")
            .with_unit("h")
            .with_bounds(1.0, 24.0)
            .with_default(12.0),
    ]
}
