mod end_to_end;
mod htpasswd;
mod utils;
