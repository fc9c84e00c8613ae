mod cook_string_tests;
mod graphql_parser_error_tests;
mod utils;
