use prefab::Builder;

#[derive(Builder)]
pub struct Foo {
    #[builder(skip, into)]
    field_a: String,
}

fn main() {}
