use chrono::NaiveDate;
use prefab::Builder;
use uuid::Uuid;

#[derive(Debug, Builder)]
#[allow(unused)]
struct Cat {
    name: String,
    lives: u8,
}

#[derive(Debug, Builder)]
#[allow(unused)]
struct Person {
    id: Uuid,
    #[builder(default = "String::from(\"Steve\")", into)]
    name: String,
    date_of_birth: NaiveDate,
    height: f64,
    website: Option<String>,
    cats: Vec<Cat>,
    best_friend: Option<Box<Person>>,
}

fn main() {
    let steve = Person::builder().build();
    println!("{steve:#?}");

    let alex = Person::builder()
        .id(Uuid::from_u128(0x2a))
        .name("Alex")
        .height(1.8)
        .cats(vec![Cat::builder().name("Tom".into()).lives(9).build()])
        .best_friend(Some(Box::new(steve)))
        .build();
    println!("{alex:#?}");
}
