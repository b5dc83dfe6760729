use quad_ngin::{DemoConfig, flow};

fn main() -> anyhow::Result<()> {
    flow::run(DemoConfig::default())
}
