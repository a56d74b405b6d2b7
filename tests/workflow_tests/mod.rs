mod builder_preview_test;
mod storage_test;
