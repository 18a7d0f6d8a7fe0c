use std::error::Error;

use valves::{compact, Searcher, Volcano};

const START: &str = "AA";
const SOLO_MINUTES: u32 = 30;
const CREW_MINUTES: u32 = 26;
const CREW_SIZE: u32 = 2;

fn main() -> Result<(), Box<dyn Error>> {
    let input = std::io::read_to_string(std::io::stdin().lock())?;
    println!("{}", part1(&input)?);
    println!("{}", part2(&input)?);
    Ok(())
}

fn part1(input: &str) -> Result<usize, Box<dyn Error>> {
    let volcano: Volcano = input.parse()?;
    let start = volcano.handle(START).ok_or(format!("no valve named {START}"))?;
    let compacted = compact(&volcano, start)?;
    let searcher = Searcher::new(&compacted, start)?;
    Ok(searcher.most_pressure(SOLO_MINUTES))
}

fn part2(input: &str) -> Result<usize, Box<dyn Error>> {
    let volcano: Volcano = input.parse()?;
    let start = volcano.handle(START).ok_or(format!("no valve named {START}"))?;
    let compacted = compact(&volcano, start)?;
    let searcher = Searcher::new(&compacted, start)?;
    Ok(searcher.most_pressure_crew(CREW_MINUTES, CREW_SIZE)?)
}
