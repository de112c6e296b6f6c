use stencil_cube::{AppConfig, flow};

fn main() -> anyhow::Result<()> {
    flow::run(AppConfig::from_env())
}
