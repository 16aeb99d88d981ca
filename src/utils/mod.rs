mod io_utils;
mod readers;

pub use io_utils::create_writer;
pub use readers::open_locus_reader;

pub type Result<T> = std::result::Result<T, String>;

pub fn handle_error_and_exit(err: String) -> ! {
    log::error!("{}", err);
    std::process::exit(1);
}
