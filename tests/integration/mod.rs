// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

mod health_test;
mod helpers;
mod keywords_api_test;
mod notes_api_test;
mod tasks_api_test;
mod webhook_test;
