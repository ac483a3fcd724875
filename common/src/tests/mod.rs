// Unit tests for the shared leaf types

mod http_status;
