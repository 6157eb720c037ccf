use anyhow::{Context, Result};
use log::info;
use singly_linked::List;

// Usage: demo [INT...]
// Without arguments the list starts empty and is filled with 5, 10 and a leading 1.
fn main() -> Result<()> {
    env_logger::init();

    let initial = std::env::args()
        .skip(1)
        .map(|arg| arg.parse::<i32>().with_context(|| format!("not an integer: {}", arg)))
        .collect::<Result<Vec<_>>>()?;

    let mut list = List::from_values(initial);
    if list.is_empty() {
        list.push(5);
        list.push(10);
        list.unshift(1);
    }
    info!("built list of length {}", list.len());
    println!("list: {} (length {})", list, list.len());
    println!("average: {}", list.average());

    if list.len() > 1 {
        let removed = list.remove_at(1)?;
        println!("removed {} at index 1, list is now {}", removed, list);
    }
    if let Some(last) = list.peek_last() {
        println!("tail holds {}", last);
    }

    match list.get_at(list.len()) {
        Ok(value) => println!("unexpected value {}", value),
        Err(err) => println!("get_at({}) failed: {}", list.len(), err),
    }

    while let Ok(value) = list.pop() {
        info!("popped {}", value);
    }
    if let Err(err) = list.shift() {
        println!("after draining: {} (average {})", err, list.average());
    }

    Ok(())
}
