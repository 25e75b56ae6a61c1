mod attendance;
mod cors_test;
mod csrf_test;
