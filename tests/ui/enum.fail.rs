use prefab::Builder;

#[derive(Builder)]
pub enum Pet {
    Cat,
    Dog,
}

fn main() {}
