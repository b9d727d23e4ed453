mod filter;
mod format;
