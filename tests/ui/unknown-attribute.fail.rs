use prefab::Builder;

#[derive(Builder)]
pub struct Foo {
    #[builder(default, repeat)]
    field_a: Vec<String>,
}

fn main() {}
