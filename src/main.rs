mod entry;
mod logger;

use reqburst::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
