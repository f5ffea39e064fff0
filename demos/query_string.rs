use nested_params::{ParameterAccess, ParameterMap, Request, ValueRef};
use std::sync::Arc;

fn print_level(map: &ParameterMap, indent: usize) {
    for key in map.keys() {
        let pad = " ".repeat(indent);
        match map.get(key) {
            Some(ValueRef::Scalar(value)) => println!("{}{} = {:?}", pad, key, value),
            Some(ValueRef::Sequence(values)) => println!("{}{} = {:?}", pad, key, values),
            Some(ValueRef::Nested(child)) => {
                println!("{}{}:", pad, key);
                print_level(child, indent + 2);
            }
            None => {}
        }
    }
}

fn main() {
    let uri = "/books/save?book.title=Groovy+in+Action&book.author.name=Dierk&book.tags=dsl&book.tags=jvm&id=3";
    let request = Arc::new(Request::from_uri(uri));
    let params = ParameterMap::from_request(request);

    println!("Request:  {}", uri);
    println!("Entries:  {}\n", params.size());
    print_level(&params, 2);

    let name = params
        .get_path(&["book", "author", "name"])
        .and_then(|value| value.as_str())
        .unwrap_or("(none)");
    println!("\nbook.author.name via nested maps: {}", name);
}
