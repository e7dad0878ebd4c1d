// ABOUTME: Workflow-level tests driving the core through the in-memory host
// ABOUTME: Cover cancellation rollback, persistence, reset and command dispatch
