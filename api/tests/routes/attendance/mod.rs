mod bulk_test;
mod sessions_test;
