pub mod catalog;
pub mod comicvine;
pub mod mylar;
pub mod reading_list;
