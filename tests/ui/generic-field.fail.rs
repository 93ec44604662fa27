use prefab::Builder;

#[derive(Builder)]
pub struct Holder<T> {
    pub value: T,
}

fn main() {}
