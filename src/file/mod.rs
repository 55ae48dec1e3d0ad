mod dialogs;

pub use dialogs::pick_folder;
