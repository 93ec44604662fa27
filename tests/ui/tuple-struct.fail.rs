use prefab::Builder;

#[derive(Builder)]
pub struct Meters(pub f64);

fn main() {}
