#[cfg(test)]
mod setup;
