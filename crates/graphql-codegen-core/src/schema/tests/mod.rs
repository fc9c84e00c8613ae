mod schema_loader_tests;
